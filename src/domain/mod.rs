//! Pure data model: wallet categories, ledger entries, state snapshots.
//! No storage or I/O concerns live here.

pub mod category;
pub mod snapshot;
pub mod transaction;

pub use category::{default_categories, Category};
pub use snapshot::{sort_categories, sort_transactions, Snapshot};
pub use transaction::{
    validate_drafts, NewTransaction, Transaction, TransactionDraft, TransactionKind,
};
