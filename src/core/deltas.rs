//! Balance derivation: per-wallet deltas accumulated over one batch.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::{Category, Transaction, TransactionKind};

/// Net signed balance change per wallet implied by a batch of entries.
///
/// Deltas accumulate before application so each affected wallet's balance
/// is written exactly once per batch, and the result is independent of the
/// order entries appear in.
#[derive(Debug, Default)]
pub struct BalanceDeltas {
    deltas: BTreeMap<String, f64>,
}

impl BalanceDeltas {
    /// Accumulates a whole batch.
    pub fn from_batch(batch: &[Transaction]) -> Self {
        let mut deltas = BalanceDeltas::default();
        for txn in batch {
            deltas.accumulate(txn);
        }
        deltas
    }

    /// Adds one entry's signed effect.
    pub fn accumulate(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Transfer => {
                if let Some(source) = &txn.from_category_id {
                    self.add(source, -txn.amount);
                }
                // A sourceless transfer is external inflow: it only credits
                // the destination.
                self.add(&txn.category_id, txn.amount);
            }
            TransactionKind::Expense => {
                let source = txn.from_category_id.as_deref().unwrap_or(&txn.category_id);
                self.add(source, -txn.amount);
            }
            TransactionKind::Income => {
                self.add(&txn.category_id, txn.amount);
            }
        }
    }

    fn add(&mut self, category_id: &str, amount: f64) {
        *self.deltas.entry(category_id.to_string()).or_insert(0.0) += amount;
    }

    /// Signed delta recorded for a wallet, zero when untouched.
    pub fn get(&self, category_id: &str) -> f64 {
        self.deltas.get(category_id).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Applies every delta once, returning the ids actually updated.
    ///
    /// Deltas aimed at wallets missing from `categories` are dropped with a
    /// warning rather than failing the batch.
    pub fn apply(&self, categories: &mut [Category]) -> Vec<String> {
        let mut applied = Vec::new();
        for (category_id, delta) in &self.deltas {
            match categories.iter_mut().find(|category| &category.id == category_id) {
                Some(category) => {
                    category.balance += delta;
                    applied.push(category_id.clone());
                }
                None => warn!(
                    "dropping balance delta {} for unknown category {}",
                    delta, category_id
                ),
            }
        }
        applied
    }
}
