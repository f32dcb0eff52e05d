//! Command definitions
//!
//! Commands represent intentions to change ledger state. Transfer and
//! deposit amounts stay raw decimals here: each engine validates the amount
//! at its fixed place in the validation order, after the account checks,
//! never at command construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AccountNumber;

use super::review::ReviewDecision;

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move funds between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    /// Sender account number
    pub from_account: AccountNumber,
    /// Receiver account number
    pub to_account: AccountNumber,
    /// Requested amount, validated by the engine
    pub amount: Decimal,
    /// User making the request; must own the sender account
    pub requested_by: Uuid,
}

impl TransferCommand {
    pub fn new(
        from_account: AccountNumber,
        to_account: AccountNumber,
        amount: Decimal,
        requested_by: Uuid,
    ) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            requested_by,
        }
    }
}

// =========================================================================
// DepositCommand
// =========================================================================

/// Command to credit a single account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCommand {
    /// Account to credit
    pub account: AccountNumber,
    /// Requested amount, validated by the engine
    pub amount: Decimal,
    /// User making the request; must own the account
    pub requested_by: Uuid,
}

impl DepositCommand {
    pub fn new(account: AccountNumber, amount: Decimal, requested_by: Uuid) -> Self {
        Self {
            account,
            amount,
            requested_by,
        }
    }
}

// =========================================================================
// ReviewCommand
// =========================================================================

/// Command to override a transaction's fraud verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCommand {
    pub transaction_id: Uuid,
    /// Parsed decision; raw strings are rejected at the boundary via
    /// `ReviewDecision::from_str`
    pub decision: ReviewDecision,
    /// Reviewer note; a fixed per-decision default applies when absent or
    /// blank
    pub reason: Option<String>,
}

impl ReviewCommand {
    pub fn new(transaction_id: Uuid, decision: ReviewDecision) -> Self {
        Self {
            transaction_id,
            decision,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: String) -> Self {
        self.reason = Some(reason);
        self
    }
}
