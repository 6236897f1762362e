//! Domain types for ledger entries and new-entry requests.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;

/// Direction of a ledger entry's effect on wallet balances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
            TransactionKind::Transfer => "Transfer",
        };
        f.write_str(label)
    }
}

/// An immutable record of one balance-affecting event.
///
/// `amount` is always positive; the signed effect on balances is derived
/// from `kind` and the presence of `from_category_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Destination (or primary) wallet.
    pub category_id: String,
    /// Source wallet, present for transfers and for expenses paid from
    /// another wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_category_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    /// Attribution label shown in history views.
    pub who: String,
    /// Free-form note.
    pub note: String,
    /// Creation time in unix milliseconds, unique within a batch.
    pub date: i64,
}

/// A validated request for one new ledger entry, not yet stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub who: String,
    pub note: String,
    pub category_id: String,
    pub from_category_id: Option<String>,
}

impl NewTransaction {
    /// Stamps the request into a ledger record.
    ///
    /// `date` is the caller-assigned creation time; the generated id embeds
    /// it plus a random suffix so ids stay unique even within one batch.
    pub fn into_transaction(self, date: i64) -> Transaction {
        Transaction {
            id: transaction_id(date),
            category_id: self.category_id,
            from_category_id: self.from_category_id,
            kind: self.kind,
            amount: self.amount,
            who: self.who,
            note: self.note,
            date,
        }
    }
}

/// One raw entry row as collected by an input form, before validation.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    /// Raw amount input; comma decimal separators are accepted.
    pub amount: String,
    pub note: String,
    /// Source wallet id for transfers and for expenses paid from elsewhere.
    pub source_id: Option<String>,
}

impl TransactionDraft {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            note: String::new(),
            source_id: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Validates the row against the wallet it was entered for.
    ///
    /// Returns `None` for unparseable or non-positive amounts and for
    /// transfers without a source wallet; the ledger never sees such rows.
    pub fn validate(&self, kind: TransactionKind, category: &Category) -> Option<NewTransaction> {
        let amount: f64 = self.amount.trim().replace(',', ".").parse().ok()?;
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let source = self.source_id.as_deref().filter(|id| !id.is_empty());
        if kind == TransactionKind::Transfer && source.is_none() {
            return None;
        }
        let from_category_id = match kind {
            TransactionKind::Expense | TransactionKind::Transfer => source.map(str::to_owned),
            TransactionKind::Income => None,
        };
        Some(NewTransaction {
            kind,
            amount,
            who: category.name.clone(),
            note: self.note.clone(),
            category_id: category.id.clone(),
            from_category_id,
        })
    }
}

/// Filters a form's rows down to the valid entries for one wallet.
pub fn validate_drafts(
    rows: &[TransactionDraft],
    kind: TransactionKind,
    category: &Category,
) -> Vec<NewTransaction> {
    rows.iter().filter_map(|row| row.validate(kind, category)).collect()
}

fn transaction_id(date: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("tx_{}_{}", date, &suffix[..9])
}
