//! Storage-layer errors

use thiserror::Error;
use uuid::Uuid;

use crate::domain::AccountNumber;

/// Errors surfaced by ledger store implementations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed on an account update
    #[error("Version conflict on account {account}: expected {expected}, found {found}")]
    VersionConflict {
        account: AccountNumber,
        expected: u64,
        found: u64,
    },

    /// Insert collided with an existing account number
    #[error("Account number already taken: {0}")]
    AccountNumberTaken(AccountNumber),

    /// Insert collided with the one-account-per-owner rule
    #[error("Owner already holds an account: {0}")]
    OwnerHasAccount(Uuid),

    /// A write referenced an account the store does not hold
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountNumber),

    /// A write referenced a transaction the store does not hold
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(Uuid),

    /// Backend failure (I/O, poisoned lock, driver error)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Check if this error came from a concurrent-write collision.
    /// Conflicts mean the state moved underneath the caller, not that the
    /// request itself was malformed.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::VersionConflict { .. } | Self::AccountNumberTaken(_) | Self::OwnerHasAccount(_)
        )
    }
}
