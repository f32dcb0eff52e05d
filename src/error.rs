//! Error handling module
//!
//! Centralized error type for ledger operations. Validation failures carry
//! the offending domain values so callers can report them without parsing
//! message strings.

use uuid::Uuid;

use crate::domain::{AccountNumber, Amount, AmountError, Balance};
use crate::store::StoreError;

/// Crate-wide Result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger operation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// No account exists under the given number
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    /// No transaction exists under the given id
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Requesting user does not own the account being moved from
    #[error("Unauthorized: requester does not own account {account}")]
    Unauthorized { account: AccountNumber },

    /// Amount failed validation (zero, negative, malformed, out of range)
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Sender balance cannot cover the requested amount
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: Balance, requested: Amount },

    /// Review decision string is not one of the accepted values
    #[error("Invalid review decision: {0}")]
    InvalidDecision(String),

    /// Owner already holds an account
    #[error("User already has an account: {0}")]
    DuplicateAccount(Uuid),

    /// Owner-keyed lookup found no account for the user
    #[error("User has no account: {0}")]
    NoAccountForOwner(Uuid),

    /// Account number allocation kept colliding with existing numbers
    #[error("Could not allocate a unique account number after {attempts} attempts")]
    AccountNumbersExhausted { attempts: u32 },

    /// Storage-layer failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Check if this is a client error (caller's fault, safe to surface)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::TransactionNotFound(_)
                | Self::Unauthorized { .. }
                | Self::InvalidAmount(_)
                | Self::InsufficientFunds { .. }
                | Self::InvalidDecision(_)
                | Self::DuplicateAccount(_)
                | Self::NoAccountForOwner(_)
        )
    }
}
