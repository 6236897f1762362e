//! The full-state pair captured for undo history and adopted on load.

use crate::domain::{Category, Transaction};

/// A complete copy of the book state: wallets plus ledger entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn new(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Sum of all wallet balances.
    pub fn total_balance(&self) -> f64 {
        self.categories.iter().map(|category| category.balance).sum()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Restores display order for wallets and chronological order for
    /// entries, for states loaded from backends that keep no ordering.
    pub fn normalize(&mut self) {
        sort_categories(&mut self.categories);
        sort_transactions(&mut self.transactions);
    }
}

/// Sorts wallets by their display order index.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| a.order.cmp(&b.order));
}

/// Sorts entries chronologically, ties broken by id for stability.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
}
