//! corebank Library
//!
//! Ledger-backed funds transfers with inline fraud screening: validated
//! money movement between accounts, an immutable transaction ledger, two
//! static fraud rules scored on every transfer, and administrative review
//! of verdicts. Storage is pluggable through the async [`store::LedgerStore`]
//! port; [`store::InMemoryLedger`] is the bundled reference implementation.

pub mod bank;
pub mod domain;
pub mod engine;
pub mod store;

mod error;

pub use bank::CoreBank;
pub use domain::{
    Account, AccountNumber, Amount, AmountError, Balance, FraudVerdict, NewAccount, Transaction,
    TransactionDraft, TransactionStatus,
};
pub use engine::{DepositCommand, ReviewCommand, ReviewDecision, TransferCommand};
pub use error::{LedgerError, LedgerResult};
pub use store::{InMemoryLedger, LedgerStore};
