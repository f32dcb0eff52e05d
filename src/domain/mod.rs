//! Domain module
//!
//! Core domain types: money, accounts, and ledger rows.

pub mod account;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountNumber, AccountNumberError, NewAccount};
pub use money::{Amount, AmountError, Balance};
pub use transaction::{FraudVerdict, Transaction, TransactionDraft, TransactionStatus};
