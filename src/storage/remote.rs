//! Remote collection-store adapter.
//!
//! The remote database itself stays opaque: anything implementing
//! [`DocumentStore`] (per-user collections of JSON documents with atomic
//! multi-document commits and change subscriptions) can sit behind the
//! adapter.

use std::sync::mpsc::Receiver;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Category, Snapshot, Transaction};
use crate::errors::BudgetError;
use crate::storage::{LoadedState, StorageBackend, StoreEvent, WriteBatch};

/// Collection holding one document per wallet category.
pub const CATEGORIES_COLLECTION: &str = "categories";
/// Collection holding one document per ledger entry.
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// One document in a per-user collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// A single write inside an atomic commit.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub collection: String,
    pub id: String,
    pub op: WriteOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Creates or fully overwrites the document.
    Set(Value),
    Delete,
}

/// Full contents of a watched collection after a change.
#[derive(Debug, Clone)]
pub struct CollectionEvent {
    pub docs: Vec<Document>,
}

/// Connection to a synchronized document database, scoped by user id.
pub trait DocumentStore {
    /// Reads every document under `users/{user_id}/{collection}`.
    fn fetch(&self, user_id: &str, collection: &str) -> Result<Vec<Document>, BudgetError>;

    /// Applies all writes as one atomic commit; either every write lands or
    /// none do.
    fn commit(&self, user_id: &str, writes: &[DocumentWrite]) -> Result<(), BudgetError>;

    /// Subscribes to a collection. The current contents arrive as the first
    /// event, later commits as further events; dropping the receiver ends
    /// the subscription.
    fn watch(&self, user_id: &str, collection: &str) -> Receiver<CollectionEvent>;
}

/// Persistence backend over a remote document store and a signed-in user.
///
/// Construct one only when an identity is present; without one the book
/// runs detached or on [`LocalStore`](crate::storage::local::LocalStore).
pub struct RemoteStore {
    store: Box<dyn DocumentStore>,
    user_id: String,
    category_events: Receiver<CollectionEvent>,
    transaction_events: Receiver<CollectionEvent>,
}

impl RemoteStore {
    /// Connects the adapter and opens both collection subscriptions.
    pub fn new(store: Box<dyn DocumentStore>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let category_events = store.watch(&user_id, CATEGORIES_COLLECTION);
        let transaction_events = store.watch(&user_id, TRANSACTIONS_COLLECTION);
        Self {
            store,
            user_id,
            category_events,
            transaction_events,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn fetch_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, BudgetError> {
        let docs = self.store.fetch(&self.user_id, collection)?;
        decode_docs(docs)
    }
}

impl StorageBackend for RemoteStore {
    fn load(&mut self) -> Result<LoadedState, BudgetError> {
        let categories: Vec<Category> = self.fetch_all(CATEGORIES_COLLECTION)?;
        let transactions: Vec<Transaction> = self.fetch_all(TRANSACTIONS_COLLECTION)?;
        Ok(LoadedState {
            // An empty categories collection marks a first run and triggers
            // seeding upstream.
            categories: if categories.is_empty() {
                None
            } else {
                Some(categories)
            },
            transactions: Some(transactions),
        })
    }

    fn persist(&mut self, _state: &Snapshot, batch: &WriteBatch) -> Result<(), BudgetError> {
        let writes = batch_writes(batch)?;
        if writes.is_empty() {
            return Ok(());
        }
        self.store.commit(&self.user_id, &writes)
    }

    fn poll_events(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        for event in self.category_events.try_iter() {
            match decode_docs::<Category>(event.docs) {
                Ok(categories) => events.push(StoreEvent::CategoriesChanged(categories)),
                Err(err) => warn!("dropping malformed category change event: {}", err),
            }
        }
        for event in self.transaction_events.try_iter() {
            match decode_docs::<Transaction>(event.docs) {
                Ok(transactions) => events.push(StoreEvent::TransactionsChanged(transactions)),
                Err(err) => warn!("dropping malformed transaction change event: {}", err),
            }
        }
        events
    }
}

/// Translates one logical mutation into the document writes of a single
/// atomic commit.
fn batch_writes(batch: &WriteBatch) -> Result<Vec<DocumentWrite>, BudgetError> {
    let mut writes = Vec::new();
    for txn in &batch.put_transactions {
        writes.push(DocumentWrite {
            collection: TRANSACTIONS_COLLECTION.to_string(),
            id: txn.id.clone(),
            op: WriteOp::Set(serde_json::to_value(txn)?),
        });
    }
    for id in &batch.delete_transaction_ids {
        writes.push(DocumentWrite {
            collection: TRANSACTIONS_COLLECTION.to_string(),
            id: id.clone(),
            op: WriteOp::Delete,
        });
    }
    for category in &batch.put_categories {
        writes.push(DocumentWrite {
            collection: CATEGORIES_COLLECTION.to_string(),
            id: category.id.clone(),
            op: WriteOp::Set(serde_json::to_value(category)?),
        });
    }
    Ok(writes)
}

fn decode_docs<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, BudgetError> {
    docs.into_iter()
        .map(|doc| serde_json::from_value(doc.data).map_err(BudgetError::from))
        .collect()
}
