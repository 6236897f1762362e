//! Domain types representing wallet categories.

use serde::{Deserialize, Serialize};

/// A named, balance-bearing wallet that ledger activity settles against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display grouping label, not unique across wallets.
    pub group: String,
    /// Display color as a `#RRGGBB` hex string.
    pub color: String,
    pub balance: f64,
    /// Display sort key, unique within a store.
    #[serde(default)]
    pub order: u32,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        group: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: group.into(),
            color: color.into(),
            balance: 0.0,
            order: 0,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// Fixed wallet set seeded on first run: `(id, name, group, color)`.
const DEFAULT_WALLETS: &[(&str, &str, &str, &str)] = &[
    ("everyday", "Everyday", "Spending", "#34D399"),
    ("groceries", "Groceries", "Spending", "#A78BFA"),
    ("fuel", "Fuel", "Spending", "#A8A29E"),
    ("shopping", "Shopping", "Spending", "#EC4899"),
    ("utilities", "Utilities", "Bills", "#F59E0B"),
    ("vacation", "Vacation", "Savings", "#60A5FA"),
    ("emergency", "Emergency", "Savings", "#F97316"),
    ("cashback", "Cashback", "Income", "#2DD4BF"),
];

/// Builds the default wallet list with zero balances and sequential order
/// indices.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_WALLETS
        .iter()
        .enumerate()
        .map(|(index, (id, name, group, color))| {
            Category::new(*id, *name, *group, *color).with_order(index as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_categories_are_sequential_and_zeroed() {
        let defaults = default_categories();
        assert!(!defaults.is_empty());
        for (index, category) in defaults.iter().enumerate() {
            assert_eq!(category.order, index as u32);
            assert_eq!(category.balance, 0.0);
        }
    }

    #[test]
    fn default_category_ids_are_unique() {
        let defaults = default_categories();
        for category in &defaults {
            let matches = defaults.iter().filter(|c| c.id == category.id).count();
            assert_eq!(matches, 1, "duplicate id {}", category.id);
        }
    }

    #[test]
    fn category_serializes_exactly_the_stored_fields() {
        let category = Category::new("fuel", "Fuel", "Spending", "#A8A29E")
            .with_balance(25.0)
            .with_order(2);
        let json = serde_json::to_value(&category).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for key in ["id", "name", "group", "color", "balance", "order"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn category_order_defaults_to_zero_when_absent() {
        let category: Category = serde_json::from_str(
            r##"{"id":"fuel","name":"Fuel","group":"Spending","color":"#A8A29E","balance":10.0}"##,
        )
        .unwrap();
        assert_eq!(category.order, 0);
    }
}
