//! The budget book: wallet balances, the entry ledger, undo history, and
//! persistence wiring behind one facade.

use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};

use crate::core::deltas::BalanceDeltas;
use crate::core::events::{BudgetEvent, EventHub};
use crate::core::history::History;
use crate::domain::{
    default_categories, sort_categories, sort_transactions, Category, NewTransaction, Snapshot,
    Transaction,
};
use crate::errors::BudgetError;
use crate::storage::{StorageBackend, StoreEvent, WriteBatch};
use crate::time::{Clock, SystemClock};

/// Sort keys for [`BudgetBook::transactions_sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
    /// Compares the destination wallet's display name.
    Category,
}

/// Facade that owns the wallet and ledger collections, derives balances,
/// keeps linear undo history, and reflects every mutation into the
/// configured storage backend.
///
/// All methods are synchronous; callers serialize access the way a UI event
/// loop does. Failed writes are logged and never abort a mutation, so the
/// in-memory state stays authoritative until the next successful save.
pub struct BudgetBook {
    state: Snapshot,
    history: History,
    backend: Option<Box<dyn StorageBackend>>,
    events: EventHub,
    clock: Box<dyn Clock>,
    loading: bool,
}

impl BudgetBook {
    /// Creates an empty book over a backend; call
    /// [`initialize`](Self::initialize) before use.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self::build(Some(backend), Box::new(SystemClock))
    }

    /// Creates a book with no backend: state lives purely in memory,
    /// starts empty, and is never persisted. Used when no signed-in
    /// identity is available.
    pub fn detached() -> Self {
        Self::build(None, Box::new(SystemClock))
    }

    /// Replaces the system clock, for deterministic stamping in tests.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Convenience for [`new`](Self::new) followed by
    /// [`initialize`](Self::initialize).
    pub fn open(backend: Box<dyn StorageBackend>) -> Result<Self, BudgetError> {
        let mut book = Self::new(backend);
        book.initialize()?;
        Ok(book)
    }

    fn build(backend: Option<Box<dyn StorageBackend>>, clock: Box<dyn Clock>) -> Self {
        Self {
            state: Snapshot::default(),
            history: History::new(Snapshot::default()),
            backend,
            events: EventHub::default(),
            clock,
            loading: true,
        }
    }

    /// Loads persisted state, seeding the default wallet set when the store
    /// has never been written.
    ///
    /// Seeded wallets are written back through the backend in one batch, so
    /// seeding happens at most once per store. Previously stored entries
    /// survive even when the wallet collection itself is absent. A detached
    /// book simply becomes ready with empty collections.
    pub fn initialize(&mut self) -> Result<(), BudgetError> {
        match self.backend.as_mut() {
            Some(backend) => {
                let loaded = backend.load()?;
                let transactions = loaded.transactions.unwrap_or_default();
                let (categories, seeded) = match loaded.categories {
                    Some(categories) => (categories, false),
                    None => (default_categories(), true),
                };
                self.state = Snapshot::new(categories, transactions);
                self.state.normalize();
                if seeded {
                    info!("seeding {} default categories", self.state.categories.len());
                    let batch = WriteBatch {
                        put_categories: self.state.categories.clone(),
                        ..WriteBatch::default()
                    };
                    self.persist(&batch);
                }
            }
            None => {
                self.state = Snapshot::default();
            }
        }
        self.history.reset(self.state.clone());
        self.loading = false;
        self.events.emit(BudgetEvent::Loaded);
        Ok(())
    }

    /// True until [`initialize`](Self::initialize) has completed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Wallets in display order.
    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    /// Ledger entries in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    /// Sum of all wallet balances.
    pub fn total_balance(&self) -> f64 {
        self.state.total_balance()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.state.category(id)
    }

    /// Entries where the wallet is the destination or the source.
    pub fn transactions_for_category(&self, category_id: &str) -> Vec<&Transaction> {
        self.state
            .transactions
            .iter()
            .filter(|txn| {
                txn.category_id == category_id
                    || txn.from_category_id.as_deref() == Some(category_id)
            })
            .collect()
    }

    /// Ledger entries ordered for history views.
    pub fn transactions_sorted(&self, key: SortKey, ascending: bool) -> Vec<&Transaction> {
        let mut entries: Vec<&Transaction> = self.state.transactions.iter().collect();
        entries.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Date => a.date.cmp(&b.date),
                SortKey::Amount => a.amount.total_cmp(&b.amount),
                SortKey::Category => self
                    .category_name(&a.category_id)
                    .cmp(self.category_name(&b.category_id)),
            };
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        entries
    }

    /// Appends a batch of entries as one atomic update and one undo step.
    ///
    /// Every entry's balance effect is accumulated first, so each affected
    /// wallet is written once no matter how large the batch. Returns the
    /// number of entries appended; an empty batch is a complete no-op with
    /// no history entry, no write, and no event.
    pub fn add_transactions(&mut self, requests: Vec<NewTransaction>) -> usize {
        if requests.is_empty() {
            return 0;
        }
        let base = self.clock.now_millis();
        let batch: Vec<Transaction> = requests
            .into_iter()
            .enumerate()
            .map(|(index, request)| request.into_transaction(base + index as i64))
            .collect();

        let deltas = BalanceDeltas::from_batch(&batch);
        let applied = deltas.apply(&mut self.state.categories);
        self.state.transactions.extend(batch.iter().cloned());

        let count = batch.len();
        let write = WriteBatch {
            put_transactions: batch,
            delete_transaction_ids: Vec::new(),
            put_categories: self.categories_by_ids(&applied),
        };
        self.commit(write, BudgetEvent::TransactionsAdded { count });
        count
    }

    /// Manually overwrites one wallet's balance, bypassing delta
    /// derivation. Unknown ids are a silent no-op.
    pub fn update_category_balance(&mut self, category_id: &str, new_balance: f64) {
        let Some(category) = self.state.category_mut(category_id) else {
            debug!("ignoring balance override for unknown category {}", category_id);
            return;
        };
        category.balance = new_balance;
        let updated = category.clone();
        let write = WriteBatch {
            put_categories: vec![updated],
            ..WriteBatch::default()
        };
        self.commit(
            write,
            BudgetEvent::BalanceOverridden {
                category_id: category_id.to_string(),
            },
        );
    }

    /// Reassigns display order to match the given id sequence.
    ///
    /// Unknown ids are skipped, wallets missing from the sequence keep
    /// their index, and a sequence that changes nothing is a no-op.
    pub fn update_category_order(&mut self, ordered_ids: &[String]) {
        let mut changed = Vec::new();
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(category) = self.state.category_mut(id) {
                if category.order != position as u32 {
                    category.order = position as u32;
                    changed.push(category.clone());
                }
            }
        }
        if changed.is_empty() {
            return;
        }
        sort_categories(&mut self.state.categories);
        let write = WriteBatch {
            put_categories: changed,
            ..WriteBatch::default()
        };
        self.commit(write, BudgetEvent::OrderChanged);
    }

    /// Steps back one undo step, restoring and persisting the prior state.
    /// Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        self.step_history(true)
    }

    /// Re-applies the most recently undone step, if any.
    pub fn redo(&mut self) -> bool {
        self.step_history(false)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots held, including the live one.
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    /// Applies change notifications queued by the backend since the last
    /// call, last writer wins. Returns whether the state changed.
    ///
    /// A genuine change resets undo history to the adopted state; events
    /// that merely echo the current state are ignored, as is an empty
    /// wallet snapshot arriving after initialization.
    pub fn refresh(&mut self) -> bool {
        let events = match self.backend.as_mut() {
            Some(backend) => backend.poll_events(),
            None => return false,
        };
        // Each event carries a full collection snapshot, so only the newest
        // one per collection matters; older queued snapshots are already
        // superseded.
        let mut latest_categories = None;
        let mut latest_transactions = None;
        for event in events {
            match event {
                StoreEvent::CategoriesChanged(categories) => {
                    latest_categories = Some(categories);
                }
                StoreEvent::TransactionsChanged(transactions) => {
                    latest_transactions = Some(transactions);
                }
            }
        }
        let mut changed = false;
        if let Some(mut categories) = latest_categories {
            if categories.is_empty() {
                debug!("ignoring empty remote category snapshot");
            } else {
                sort_categories(&mut categories);
                if categories != self.state.categories {
                    self.state.categories = categories;
                    changed = true;
                }
            }
        }
        if let Some(mut transactions) = latest_transactions {
            sort_transactions(&mut transactions);
            if transactions != self.state.transactions {
                self.state.transactions = transactions;
                changed = true;
            }
        }
        if changed {
            self.history.reset(self.state.clone());
            self.events.emit(BudgetEvent::Refreshed);
        }
        changed
    }

    /// Hands out a channel receiving one [`BudgetEvent`] per state change.
    pub fn subscribe(&mut self) -> Receiver<BudgetEvent> {
        self.events.subscribe()
    }

    fn step_history(&mut self, back: bool) -> bool {
        let restored = if back {
            self.history.undo()
        } else {
            self.history.redo()
        };
        let Some(restored) = restored else {
            return false;
        };
        let restored = restored.clone();
        let write = WriteBatch::diff(&self.state, &restored);
        self.state = restored;
        self.persist(&write);
        self.events.emit(if back {
            BudgetEvent::Undone
        } else {
            BudgetEvent::Redone
        });
        true
    }

    fn category_name(&self, id: &str) -> &str {
        self.state
            .category(id)
            .map(|category| category.name.as_str())
            .unwrap_or("")
    }

    fn categories_by_ids(&self, ids: &[String]) -> Vec<Category> {
        ids.iter()
            .filter_map(|id| self.state.category(id).cloned())
            .collect()
    }

    fn commit(&mut self, write: WriteBatch, event: BudgetEvent) {
        self.history.commit(self.state.clone());
        self.persist(&write);
        self.events.emit(event);
    }

    fn persist(&mut self, batch: &WriteBatch) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if batch.is_empty() {
            return;
        }
        if let Err(err) = backend.persist(&self.state, batch) {
            warn!("save failed, in-memory state is ahead of storage: {}", err);
        }
    }
}
