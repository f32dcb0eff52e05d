//! End-to-end engine flows over the in-memory ledger

use std::sync::Arc;

use corebank::store::InMemoryLedger;
use corebank::{
    CoreBank, DepositCommand, LedgerError, ReviewCommand, ReviewDecision, TransactionStatus,
    TransferCommand,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

mod common;

use common::{balance_of, number, seed_account};

fn bank_over(store: &Arc<InMemoryLedger>) -> CoreBank<InMemoryLedger> {
    CoreBank::new(Arc::clone(store))
}

#[tokio::test]
async fn test_large_transfer_completes_flagged_and_conserves_funds() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(100000)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(2500)).await;
    let bank = bank_over(&store);

    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(60000),
            alice,
        ))
        .await
        .unwrap();

    // The amount rule flags the row, but the funds still move.
    assert_eq!(row.status(), TransactionStatus::Success);
    assert!(row.is_fraud());
    let reason = row.fraud_reason().unwrap();
    assert!(reason.contains("60000"), "reason was: {reason}");
    assert!(reason.contains("50000"), "reason was: {reason}");

    assert_eq!(balance_of(&store, "0000000001").await, dec!(40000));
    assert_eq!(balance_of(&store, "0000000002").await, dec!(62500));

    // The flagged row shows up in the admin view.
    let flagged = bank.fraud_transactions().await.unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].id(), row.id());
}

#[tokio::test]
async fn test_insufficient_funds_leaves_failed_row_and_balances() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(10)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    let err = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(100),
            alice,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    assert_eq!(balance_of(&store, "0000000001").await, dec!(10));
    assert_eq!(balance_of(&store, "0000000002").await, dec!(0));

    let rows = bank.all_transactions().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status(), TransactionStatus::Failed);
    assert_eq!(rows[0].amount().value(), dec!(100));
    assert!(!rows[0].is_fraud());

    // The failed attempt is visible in both parties' histories.
    assert_eq!(bank.transactions_for_owner(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_velocity_rule_fires_on_fourth_rapid_transfer() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(1000)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    let mut rows = Vec::new();
    for _ in 0..4 {
        let row = bank
            .transfer(TransferCommand::new(
                number("0000000001"),
                number("0000000002"),
                dec!(10),
                alice,
            ))
            .await
            .unwrap();
        rows.push(row);
    }

    for early in &rows[..3] {
        assert!(!early.is_fraud(), "row {} flagged early", early.id());
        assert!(early.fraud_reason().is_none());
    }
    let fourth = &rows[3];
    assert!(fourth.is_fraud());
    let reason = fourth.fraud_reason().unwrap();
    assert!(reason.contains("More than 3 transactions"), "reason was: {reason}");
    assert!(reason.contains("minute"), "reason was: {reason}");

    // All four still moved money.
    assert_eq!(balance_of(&store, "0000000001").await, dec!(960));
    assert_eq!(balance_of(&store, "0000000002").await, dec!(40));
}

#[tokio::test]
async fn test_failed_attempts_count_toward_velocity() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(15)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    // Three insufficient-funds attempts leave three FAILED rows.
    for _ in 0..3 {
        let err = bank
            .transfer(TransferCommand::new(
                number("0000000001"),
                number("0000000002"),
                dec!(100),
                alice,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    // The next transfer succeeds but the velocity rule counts the failures.
    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(10),
            alice,
        ))
        .await
        .unwrap();
    assert_eq!(row.status(), TransactionStatus::Success);
    assert!(row.is_fraud());
    assert!(row.fraud_reason().unwrap().contains("More than 3 transactions"));
}

#[tokio::test]
async fn test_deposits_feed_velocity_history_but_never_flag() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(100)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    // Deposits record the account on the from side, so they land in the
    // sender's velocity window, yet no deposit is ever flagged itself.
    for _ in 0..3 {
        let row = bank
            .deposit(DepositCommand::new(
                number("0000000001"),
                dec!(60000),
                alice,
            ))
            .await
            .unwrap();
        assert!(!row.is_fraud());
        assert!(row.fraud_reason().is_none());
    }

    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(10),
            alice,
        ))
        .await
        .unwrap();
    assert!(row.is_fraud());
    assert!(row.fraud_reason().unwrap().contains("More than 3 transactions"));
}

#[tokio::test]
async fn test_review_overrides_and_reapplies_cleanly() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(100000)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(60000),
            alice,
        ))
        .await
        .unwrap();
    assert!(row.is_fraud());

    // Admin clears the flag; the clearance note replaces the rule reason.
    let cleared = bank
        .review(
            ReviewCommand::new(row.id(), ReviewDecision::Safe)
                .with_reason("verified with customer".to_string()),
        )
        .await
        .unwrap();
    assert!(!cleared.is_fraud());
    assert_eq!(cleared.fraud_reason(), Some("verified with customer"));
    assert!(bank.fraud_transactions().await.unwrap().is_empty());

    // Reviewing again with the same decision is stable.
    let again = bank
        .review(ReviewCommand::new(row.id(), ReviewDecision::Safe))
        .await
        .unwrap();
    assert!(!again.is_fraud());
    assert_eq!(again.fraud_reason(), Some("Marked as safe by admin"));

    // And the admin can flip it back.
    let reflagged = bank
        .review(ReviewCommand::new(row.id(), ReviewDecision::ConfirmedFraud))
        .await
        .unwrap();
    assert!(reflagged.is_fraud());
    assert_eq!(reflagged.fraud_reason(), Some("Confirmed as fraud by admin"));
}

#[tokio::test]
async fn test_unrecognized_decision_leaves_record_unchanged() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(100)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(10),
            alice,
        ))
        .await
        .unwrap();

    // The raw string is rejected at the boundary, before any store access.
    let err = "FRAUDULENT".parse::<ReviewDecision>().unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDecision(s) if s == "FRAUDULENT"));

    let unchanged = bank.all_transactions().await.unwrap();
    assert_eq!(unchanged.len(), 1);
    assert_eq!(unchanged[0], row);
}

#[tokio::test]
async fn test_transfer_to_unknown_receiver_then_valid_retry() {
    let store = Arc::new(InMemoryLedger::new());
    let alice = Uuid::new_v4();
    seed_account(&store, "0000000001", alice, dec!(100)).await;
    seed_account(&store, "0000000002", Uuid::new_v4(), dec!(0)).await;
    let bank = bank_over(&store);

    let err = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000777"),
            dec!(10),
            alice,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(n) if n == number("0000000777")));
    assert!(bank.all_transactions().await.unwrap().is_empty());

    // The failure left nothing behind, so the retry against the real
    // receiver starts from a clean slate.
    let row = bank
        .transfer(TransferCommand::new(
            number("0000000001"),
            number("0000000002"),
            dec!(10),
            alice,
        ))
        .await
        .unwrap();
    assert_eq!(row.status(), TransactionStatus::Success);
    assert_eq!(balance_of(&store, "0000000001").await, dec!(90));
}
