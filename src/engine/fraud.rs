//! Fraud Rule Engine
//!
//! Two static rules scored inline with every transfer: a single-amount
//! threshold and a per-sender velocity count over a trailing window. Both
//! rules always run; when both fire their reasons are joined into one
//! string. Scoring is advisory: it annotates the row, it never blocks the
//! movement, and it performs no writes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{AccountNumber, Amount, FraudVerdict};
use crate::store::{LedgerStore, StoreError};

/// Amount above which a single transfer is flagged.
pub const AMOUNT_THRESHOLD: i64 = 50_000;
/// Prior same-sender rows inside the window at which the velocity rule
/// fires. The row being scored is not yet persisted and never counts, so
/// the rule first fires on the fourth transfer inside the window.
pub const VELOCITY_MAX_TRANSACTIONS: usize = 3;
/// Trailing window the velocity rule counts over.
pub const VELOCITY_WINDOW_MINUTES: i64 = 1;

/// Rule core, pure over its inputs: deterministic verdicts for identical
/// amounts and identical history counts.
pub fn evaluate_rules(amount: &Amount, prior_in_window: usize) -> FraudVerdict {
    let mut reasons: Vec<String> = Vec::new();

    if amount.value() > Decimal::from(AMOUNT_THRESHOLD) {
        reasons.push(format!(
            "Transaction amount ({amount}) exceeds threshold of {AMOUNT_THRESHOLD}."
        ));
    }

    if prior_in_window >= VELOCITY_MAX_TRANSACTIONS {
        reasons.push(format!(
            "More than {VELOCITY_MAX_TRANSACTIONS} transactions detected within \
             {VELOCITY_WINDOW_MINUTES} minute(s) from the same account."
        ));
    }

    if reasons.is_empty() {
        FraudVerdict::clean()
    } else {
        FraudVerdict::flagged(reasons.join(" "))
    }
}

/// Scores proposed transfers against committed history
pub struct FraudRuleEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> FraudRuleEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Evaluate both rules for a transfer of `amount` sent by `sender` at
    /// instant `at`. History is whatever the store has committed with the
    /// sender on the from side and a timestamp strictly inside the trailing
    /// window; failed attempts and deposits count like any other row. A
    /// lookup failure here is an infrastructure defect, never a business
    /// outcome.
    pub async fn evaluate(
        &self,
        sender: &AccountNumber,
        amount: &Amount,
        at: DateTime<Utc>,
    ) -> Result<FraudVerdict, StoreError> {
        let cutoff = at - Duration::minutes(VELOCITY_WINDOW_MINUTES);
        let prior = self.store.sent_since(sender, cutoff).await?;
        Ok(evaluate_rules(amount, prior.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Balance, NewAccount, TransactionDraft};
    use crate::store::{InMemoryLedger, WriteBatch};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn amount(value: &str) -> Amount {
        value.parse().unwrap()
    }

    #[test]
    fn test_amount_at_threshold_does_not_flag() {
        let verdict = evaluate_rules(&amount("50000.00"), 0);
        assert!(!verdict.is_flagged());
        assert!(verdict.reason().is_none());
    }

    #[test]
    fn test_amount_above_threshold_flags_with_both_numbers() {
        let verdict = evaluate_rules(&amount("50000.01"), 0);
        assert!(verdict.is_flagged());
        let reason = verdict.reason().unwrap();
        assert!(reason.contains("50000.01"));
        assert!(reason.contains("50000"));
        assert!(reason.contains("exceeds threshold"));
    }

    #[test]
    fn test_velocity_boundary() {
        // Two prior rows inside the window: the third transfer is clean.
        assert!(!evaluate_rules(&amount("10"), 2).is_flagged());

        // Three prior rows: the fourth flags.
        let verdict = evaluate_rules(&amount("10"), 3);
        assert!(verdict.is_flagged());
        let reason = verdict.reason().unwrap();
        assert!(reason.contains("More than 3 transactions"));
        assert!(reason.contains("1 minute(s)"));
    }

    #[test]
    fn test_both_rules_join_reasons_single_spaced() {
        let verdict = evaluate_rules(&amount("60000"), 5);
        let reason = verdict.reason().unwrap();
        assert!(reason.contains("exceeds threshold"));
        assert!(reason.contains("More than 3 transactions"));
        assert!(!reason.contains("  "));
        assert_eq!(reason, reason.trim());
    }

    #[test]
    fn test_determinism() {
        let first = evaluate_rules(&amount("60000"), 3);
        let second = evaluate_rules(&amount("60000"), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_evaluate_counts_only_window_rows() {
        let store = Arc::new(InMemoryLedger::new());
        let sender: AccountNumber = "0000000001".parse().unwrap();
        let receiver: AccountNumber = "0000000002".parse().unwrap();

        let now = Utc::now();
        let mut batch = WriteBatch::new()
            .insert_account(
                NewAccount::new(sender.clone(), Uuid::new_v4())
                    .with_balance(Balance::new(dec!(1000)).unwrap()),
            )
            .insert_account(NewAccount::new(receiver.clone(), Uuid::new_v4()));
        // Two rows inside the window, one outside it.
        for seconds_ago in [5, 30, 90] {
            batch = batch.insert_transaction(
                TransactionDraft::success(sender.clone(), receiver.clone(), amount("10"))
                    .at(now - Duration::seconds(seconds_ago)),
            );
        }
        store.commit(batch).await.unwrap();

        let engine = FraudRuleEngine::new(Arc::clone(&store));
        let verdict = engine.evaluate(&sender, &amount("10"), now).await.unwrap();
        assert!(!verdict.is_flagged());

        // A third in-window row pushes the next transfer over the limit.
        store
            .commit(WriteBatch::new().insert_transaction(
                TransactionDraft::success(sender.clone(), receiver.clone(), amount("10"))
                    .at(now - Duration::seconds(10)),
            ))
            .await
            .unwrap();
        let verdict = engine.evaluate(&sender, &amount("10"), now).await.unwrap();
        assert!(verdict.is_flagged());
    }
}
