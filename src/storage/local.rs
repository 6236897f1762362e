//! Filesystem blob storage: one JSON file per collection key.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::Snapshot;
use crate::errors::BudgetError;
use crate::storage::{LoadedState, StorageBackend, WriteBatch};

/// Blob key for the serialized category collection.
pub const CATEGORIES_KEY: &str = "home_budget_categories";
/// Blob key for the serialized transaction collection.
pub const TRANSACTIONS_KEY: &str = "home_budget_transactions";

/// Local persistence backend. Each blob key maps to `<dir>/<key>.json`
/// holding one UTF-8 JSON array that is replaced wholesale on every save;
/// a mutation rewrites only the collections it touched.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Opens a blob directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BudgetError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the default blob directory under the platform data dir.
    pub fn open_default() -> Result<Self, BudgetError> {
        Self::new(Self::default_dir())
    }

    /// Default blob directory under the platform data dir.
    pub fn default_dir() -> PathBuf {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("home-budget")
    }

    /// File path backing a blob key.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>, BudgetError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn write_key<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), BudgetError> {
        let json = serde_json::to_string(records)?;
        write_atomic(&self.key_path(key), &json)
    }
}

impl StorageBackend for LocalStore {
    fn load(&mut self) -> Result<LoadedState, BudgetError> {
        Ok(LoadedState {
            categories: self.read_key(CATEGORIES_KEY)?,
            transactions: self.read_key(TRANSACTIONS_KEY)?,
        })
    }

    fn persist(&mut self, state: &Snapshot, batch: &WriteBatch) -> Result<(), BudgetError> {
        if batch.touches_categories() {
            self.write_key(CATEGORIES_KEY, &state.categories)?;
        }
        if batch.touches_transactions() {
            self.write_key(TRANSACTIONS_KEY, &state.transactions)?;
        }
        Ok(())
    }
}

/// Writes by staging to a temporary sibling file and renaming, so a failed
/// save never truncates the previous blob.
fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
