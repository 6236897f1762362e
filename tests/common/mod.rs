use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::TempDir;
use wallet_core::core::book::BudgetBook;
use wallet_core::storage::local::LocalStore;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Registers a unique directory for one test and returns its path, so a
/// test can reopen the same blob store several times.
pub fn isolated_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Opens an initialized book over a local blob store in `dir`.
pub fn open_local_book(dir: &std::path::Path) -> BudgetBook {
    let store = LocalStore::new(dir).expect("create local store");
    BudgetBook::open(Box::new(store)).expect("initialize book")
}
