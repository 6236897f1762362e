#![doc(test(attr(deny(warnings))))]

//! Wallet Core keeps the ledger state behind a personal budget tracker:
//! wallet categories with derived balances, an append-only transaction
//! ledger, linear undo/redo history, and pluggable local or remote
//! persistence.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod format;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Wallet Core tracing initialized.");
    });
}
