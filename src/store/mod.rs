//! Storage module
//!
//! The [`LedgerStore`] port, its error type, and the in-memory reference
//! implementation.

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::StoreError;
pub use ledger::{CommitOutcome, LedgerStore, LedgerWrite, WriteBatch};
pub use memory::InMemoryLedger;
