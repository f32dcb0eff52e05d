//! Transaction ledger rows
//!
//! A transaction is the immutable record of a funds-movement attempt. Rows
//! reference accounts by number string, not by live reference: they are
//! historical facts and survive later account mutation unaffected. After
//! commit only the fraud fields may change, and only through review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::account::AccountNumber;
use super::money::Amount;

/// Outcome of a funds-movement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Success => write!(f, "SUCCESS"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// A fraud verdict: flagged or clean, with the human-readable reason when
/// flagged. Applying a clean verdict explicitly blanks any earlier reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudVerdict {
    flagged: bool,
    reason: Option<String>,
}

impl FraudVerdict {
    /// A clean verdict: not fraud, no reason.
    pub fn clean() -> Self {
        Self {
            flagged: false,
            reason: None,
        }
    }

    /// A flagged verdict with its reason text.
    pub fn flagged(reason: impl Into<String>) -> Self {
        Self {
            flagged: true,
            reason: Some(reason.into()),
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// An unsaved ledger row. The store assigns the id at commit; if the
/// timestamp is left unset the store fills in its own clock at commit
/// (the failed-transfer row relies on that default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    from_account: AccountNumber,
    to_account: AccountNumber,
    amount: Amount,
    timestamp: Option<DateTime<Utc>>,
    status: TransactionStatus,
    is_fraud: bool,
    fraud_reason: Option<String>,
}

impl TransactionDraft {
    /// Draft for a completed movement. Callers stamp it with `at` before
    /// fraud evaluation so the velocity window anchors on the same instant.
    pub fn success(from_account: AccountNumber, to_account: AccountNumber, amount: Amount) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            timestamp: None,
            status: TransactionStatus::Success,
            is_fraud: false,
            fraud_reason: None,
        }
    }

    /// Draft for a failed attempt (insufficient funds). No timestamp is
    /// assigned here; the store default applies.
    pub fn failed(from_account: AccountNumber, to_account: AccountNumber, amount: Amount) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            timestamp: None,
            status: TransactionStatus::Failed,
            is_fraud: false,
            fraud_reason: None,
        }
    }

    /// Set the creation instant.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Apply a fraud verdict. A clean verdict clears the reason rather than
    /// leaving a stale value in place.
    pub fn with_verdict(mut self, verdict: FraudVerdict) -> Self {
        self.is_fraud = verdict.is_flagged();
        self.fraud_reason = verdict.reason().map(str::to_owned);
        self
    }

    pub fn from_account(&self) -> &AccountNumber {
        &self.from_account
    }

    pub fn to_account(&self) -> &AccountNumber {
        &self.to_account
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn is_fraud(&self) -> bool {
        self.is_fraud
    }

    pub fn fraud_reason(&self) -> Option<&str> {
        self.fraud_reason.as_deref()
    }
}

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    from_account: AccountNumber,
    to_account: AccountNumber,
    amount: Amount,
    timestamp: DateTime<Utc>,
    status: TransactionStatus,
    is_fraud: bool,
    fraud_reason: Option<String>,
}

impl Transaction {
    /// Reconstruct a row from stored state. Used by store implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        from_account: AccountNumber,
        to_account: AccountNumber,
        amount: Amount,
        timestamp: DateTime<Utc>,
        status: TransactionStatus,
        is_fraud: bool,
        fraud_reason: Option<String>,
    ) -> Self {
        Self {
            id,
            from_account,
            to_account,
            amount,
            timestamp,
            status,
            is_fraud,
            fraud_reason,
        }
    }

    /// Copy of this row with replaced fraud fields. The fraud fields are the
    /// only mutable part of a persisted row; stores use this to apply review
    /// outcomes.
    pub fn with_fraud_status(mut self, is_fraud: bool, fraud_reason: Option<String>) -> Self {
        self.is_fraud = is_fraud;
        self.fraud_reason = fraud_reason;
        self
    }

    /// A deposit records the same account on both sides.
    pub fn is_deposit(&self) -> bool {
        self.from_account == self.to_account
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from_account(&self) -> &AccountNumber {
        &self.from_account
    }

    pub fn to_account(&self) -> &AccountNumber {
        &self.to_account
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn is_fraud(&self) -> bool {
        self.is_fraud
    }

    pub fn fraud_reason(&self) -> Option<&str> {
        self.fraud_reason.as_deref()
    }
}
