//! Persistence backends for the budget book.
//!
//! One polymorphic [`StorageBackend`] covers both the local JSON blob store
//! and the remote synchronized collection store; the book picks an
//! implementation at construction time and never inspects which one it got.

pub mod local;
pub mod memory;
pub mod remote;

use crate::domain::{Category, Snapshot, Transaction};
use crate::errors::BudgetError;

/// Collections read back by [`StorageBackend::load`].
///
/// `None` means the collection has never been written, which is distinct
/// from an empty list: absent categories trigger default seeding while
/// independently loaded transactions survive.
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub categories: Option<Vec<Category>>,
    pub transactions: Option<Vec<Transaction>>,
}

/// Everything one logical mutation changed, applied as a unit.
///
/// Backends pick their own write strategy: the local store rewrites the blob
/// of each touched collection, the remote store commits the contained
/// document writes as one atomic batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub put_transactions: Vec<Transaction>,
    pub delete_transaction_ids: Vec<String>,
    pub put_categories: Vec<Category>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.put_transactions.is_empty()
            && self.delete_transaction_ids.is_empty()
            && self.put_categories.is_empty()
    }

    pub fn touches_categories(&self) -> bool {
        !self.put_categories.is_empty()
    }

    pub fn touches_transactions(&self) -> bool {
        !self.put_transactions.is_empty() || !self.delete_transaction_ids.is_empty()
    }

    /// Builds the batch that turns `old` into `new`. Used when a restored
    /// state must be persisted instead of a forward mutation.
    pub fn diff(old: &Snapshot, new: &Snapshot) -> Self {
        let mut batch = WriteBatch::default();
        for txn in &new.transactions {
            if old.transaction(&txn.id).is_none() {
                batch.put_transactions.push(txn.clone());
            }
        }
        for txn in &old.transactions {
            if new.transaction(&txn.id).is_none() {
                batch.delete_transaction_ids.push(txn.id.clone());
            }
        }
        for category in &new.categories {
            if old.category(&category.id) != Some(category) {
                batch.put_categories.push(category.clone());
            }
        }
        batch
    }
}

/// A change observed on the backing store, delivered by
/// [`StorageBackend::poll_events`]. Each event carries the full replacement
/// contents of one collection.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    CategoriesChanged(Vec<Category>),
    TransactionsChanged(Vec<Transaction>),
}

/// Abstraction over persistence backends capable of storing the book state.
pub trait StorageBackend {
    /// Reads both collections; `None` entries mean never written.
    fn load(&mut self) -> Result<LoadedState, BudgetError>;

    /// Durably applies one mutation. `state` is the full resulting state and
    /// `batch` the change that produced it; implementations use whichever
    /// fits their write model.
    fn persist(&mut self, state: &Snapshot, batch: &WriteBatch) -> Result<(), BudgetError>;

    /// Drains change notifications observed since the last call. Backends
    /// without live subscriptions return nothing.
    fn poll_events(&mut self) -> Vec<StoreEvent> {
        Vec::new()
    }
}
