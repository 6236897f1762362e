//! Business logic for the budget book: the state facade, balance
//! derivation, undo history, and change notifications.

pub mod book;
pub mod deltas;
pub mod events;
pub mod history;

pub use book::{BudgetBook, SortKey};
pub use deltas::BalanceDeltas;
pub use events::{BudgetEvent, EventHub};
pub use history::History;
