//! In-memory document store with live change notifications.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{
        mpsc::{channel, Receiver, Sender},
        Arc, RwLock,
    },
};

use serde_json::Value;

use crate::errors::BudgetError;
use crate::storage::remote::{CollectionEvent, Document, DocumentStore, DocumentWrite, WriteOp};

/// Shared in-memory [`DocumentStore`], used in tests and wherever a real
/// remote database is absent. Clones share the same underlying collections,
/// so several adapters can observe each other's commits.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

type CollectionKey = (String, String);

#[derive(Default)]
struct Inner {
    collections: HashMap<CollectionKey, BTreeMap<String, Value>>,
    watchers: Vec<Watcher>,
}

struct Watcher {
    user_id: String,
    collection: String,
    sender: Sender<CollectionEvent>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in one collection.
    pub fn collection_len(&self, user_id: &str, collection: &str) -> usize {
        let inner = self.inner.read().unwrap();
        inner
            .collections
            .get(&(user_id.to_string(), collection.to_string()))
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for MemoryDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap();
        f.debug_struct("MemoryDocumentStore")
            .field("collections", &inner.collections.len())
            .field("watchers", &inner.watchers.len())
            .finish()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch(&self, user_id: &str, collection: &str) -> Result<Vec<Document>, BudgetError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.docs(user_id, collection))
    }

    fn commit(&self, user_id: &str, writes: &[DocumentWrite]) -> Result<(), BudgetError> {
        let mut inner = self.inner.write().unwrap();
        let mut touched: Vec<String> = Vec::new();
        for write in writes {
            let key = (user_id.to_string(), write.collection.clone());
            let docs = inner.collections.entry(key).or_default();
            match &write.op {
                WriteOp::Set(value) => {
                    docs.insert(write.id.clone(), value.clone());
                }
                WriteOp::Delete => {
                    docs.remove(&write.id);
                }
            }
            if !touched.contains(&write.collection) {
                touched.push(write.collection.clone());
            }
        }
        for collection in touched {
            inner.notify(user_id, &collection);
        }
        Ok(())
    }

    fn watch(&self, user_id: &str, collection: &str) -> Receiver<CollectionEvent> {
        let (sender, receiver) = channel();
        let mut inner = self.inner.write().unwrap();
        // A live subscription delivers the current contents first.
        let _ = sender.send(CollectionEvent {
            docs: inner.docs(user_id, collection),
        });
        inner.watchers.push(Watcher {
            user_id: user_id.to_string(),
            collection: collection.to_string(),
            sender,
        });
        receiver
    }
}

impl Inner {
    fn docs(&self, user_id: &str, collection: &str) -> Vec<Document> {
        self.collections
            .get(&(user_id.to_string(), collection.to_string()))
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn notify(&mut self, user_id: &str, collection: &str) {
        let docs = self.docs(user_id, collection);
        self.watchers.retain(|watcher| {
            if watcher.user_id != user_id || watcher.collection != collection {
                return true;
            }
            watcher
                .sender
                .send(CollectionEvent { docs: docs.clone() })
                .is_ok()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(collection: &str, id: &str, value: Value) -> DocumentWrite {
        DocumentWrite {
            collection: collection.into(),
            id: id.into(),
            op: WriteOp::Set(value),
        }
    }

    #[test]
    fn watch_delivers_current_contents_first() {
        let store = MemoryDocumentStore::new();
        store
            .commit("u", &[set("categories", "a", json!({"id": "a"}))])
            .unwrap();
        let receiver = store.watch("u", "categories");
        let event = receiver.try_recv().unwrap();
        assert_eq!(event.docs.len(), 1);
        assert_eq!(event.docs[0].id, "a");
    }

    #[test]
    fn commit_notifies_each_touched_collection_once() {
        let store = MemoryDocumentStore::new();
        let receiver = store.watch("u", "transactions");
        receiver.try_recv().unwrap();

        store
            .commit(
                "u",
                &[
                    set("transactions", "t1", json!({"id": "t1"})),
                    set("transactions", "t2", json!({"id": "t2"})),
                ],
            )
            .unwrap();

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.docs.len(), 2);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn delete_removes_the_document() {
        let store = MemoryDocumentStore::new();
        store
            .commit("u", &[set("transactions", "t1", json!({"id": "t1"}))])
            .unwrap();
        store
            .commit(
                "u",
                &[DocumentWrite {
                    collection: "transactions".into(),
                    id: "t1".into(),
                    op: WriteOp::Delete,
                }],
            )
            .unwrap();
        assert_eq!(store.collection_len("u", "transactions"), 0);
    }

    #[test]
    fn clones_share_the_same_collections() {
        let store = MemoryDocumentStore::new();
        let clone = store.clone();
        clone
            .commit("u", &[set("categories", "a", json!({"id": "a"}))])
            .unwrap();
        assert_eq!(store.collection_len("u", "categories"), 1);
    }

    #[test]
    fn dropped_watchers_are_pruned_on_the_next_commit() {
        let store = MemoryDocumentStore::new();
        let receiver = store.watch("u", "categories");
        drop(receiver);
        store
            .commit("u", &[set("categories", "a", json!({"id": "a"}))])
            .unwrap();
        let inner = store.inner.read().unwrap();
        assert!(inner.watchers.is_empty());
    }
}
