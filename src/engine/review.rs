//! Fraud Review Engine
//!
//! Administrative override of a transaction's fraud verdict. Review is the
//! one path that can attach a reason to a row whose fraud flag is false
//! (the clearance note).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::Transaction;
use crate::error::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, StoreError, WriteBatch};

use super::commands::ReviewCommand;

/// Closed set of review decisions, parsed case-insensitively from the wire
/// strings. Anything else is rejected at the boundary as `InvalidDecision`
/// before any store access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    ConfirmedFraud,
    Safe,
}

impl ReviewDecision {
    /// Fraud flag this decision writes.
    pub fn is_fraud(self) -> bool {
        matches!(self, Self::ConfirmedFraud)
    }

    /// Reason recorded when the reviewer supplies none.
    pub fn default_reason(self) -> &'static str {
        match self {
            Self::ConfirmedFraud => "Confirmed as fraud by admin",
            Self::Safe => "Marked as safe by admin",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfirmedFraud => write!(f, "CONFIRMED_FRAUD"),
            Self::Safe => write!(f, "SAFE"),
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("CONFIRMED_FRAUD") {
            Ok(Self::ConfirmedFraud)
        } else if s.eq_ignore_ascii_case("SAFE") {
            Ok(Self::Safe)
        } else {
            Err(LedgerError::InvalidDecision(s.to_string()))
        }
    }
}

/// Engine for fraud verdict overrides
pub struct FraudReviewEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> FraudReviewEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Execute the review command. Overwrites the row's fraud fields with
    /// the decision's flag and the supplied reason, falling back to the
    /// decision's fixed default when the reason is absent or blank.
    pub async fn execute(&self, command: ReviewCommand) -> LedgerResult<Transaction> {
        let row = self
            .store
            .transaction_by_id(command.transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(command.transaction_id))?;

        let decision = command.decision;
        let reason = command
            .reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| decision.default_reason().to_string());

        let updated = self
            .store
            .commit(WriteBatch::new().set_fraud_status(
                row.id(),
                decision.is_fraud(),
                Some(reason),
            ))
            .await?
            .single_transaction()
            .ok_or_else(|| {
                LedgerError::Store(StoreError::Backend(
                    "commit returned no transaction row".to_string(),
                ))
            })?;

        tracing::info!(
            id = %updated.id(),
            decision = %decision,
            fraud = updated.is_fraud(),
            "fraud review applied"
        );
        Ok(updated)
    }
}
