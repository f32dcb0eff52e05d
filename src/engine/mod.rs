//! Engines module
//!
//! Write-side engines that orchestrate validation, balance mutation, fraud
//! scoring, and atomic commits over the ledger store, plus the read-side
//! `LedgerQueries`. Each engine call is one unit of work.

mod account;
mod commands;
mod deposit;
mod fraud;
mod locks;
mod queries;
mod review;
mod transfer;


pub use account::AccountEngine;
pub use commands::{DepositCommand, ReviewCommand, TransferCommand};
pub use deposit::DepositEngine;
pub use fraud::{
    evaluate_rules, FraudRuleEngine, AMOUNT_THRESHOLD, VELOCITY_MAX_TRANSACTIONS,
    VELOCITY_WINDOW_MINUTES,
};
pub use locks::{AccountLocks, PairGuard};
pub use queries::LedgerQueries;
pub use review::{FraudReviewEngine, ReviewDecision};
pub use transfer::TransferEngine;
