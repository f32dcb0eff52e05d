//! Transfer Engine
//!
//! Orchestrates account-to-account transfers: validation in a fixed order,
//! balance mutation, fraud scoring, and a single atomic commit of the
//! account updates with their ledger row.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Amount, Transaction, TransactionDraft};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, StoreError, WriteBatch};

use super::commands::TransferCommand;
use super::fraud::FraudRuleEngine;
use super::locks::AccountLocks;

/// Engine for account-to-account transfers
pub struct TransferEngine<S> {
    store: Arc<S>,
    locks: Arc<AccountLocks>,
    fraud: FraudRuleEngine<S>,
}

impl<S: LedgerStore> TransferEngine<S> {
    pub fn new(store: Arc<S>, locks: Arc<AccountLocks>) -> Self {
        Self {
            fraud: FraudRuleEngine::new(Arc::clone(&store)),
            store,
            locks,
        }
    }

    /// Execute the transfer command.
    ///
    /// The first failing validation wins. Failures before the balance check
    /// leave no trace; an insufficient balance writes one FAILED row and
    /// nothing else; success commits both balance updates and the SUCCESS
    /// row as one batch, with the fraud verdict already applied.
    pub async fn execute(&self, command: TransferCommand) -> LedgerResult<Transaction> {
        // Hold both account locks across the whole read-validate-commit span.
        let _guards = self
            .locks
            .lock_pair(&command.from_account, &command.to_account)
            .await;

        // Sender account must exist
        let sender = self
            .store
            .account_by_number(&command.from_account)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(command.from_account.clone()))?;

        // Sender account must belong to the requesting user
        if !sender.is_owned_by(command.requested_by) {
            return Err(LedgerError::Unauthorized {
                account: command.from_account.clone(),
            });
        }

        // Receiver account must exist
        let receiver = self
            .store
            .account_by_number(&command.to_account)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(command.to_account.clone()))?;

        // Amount must be strictly positive and well-formed
        let amount = Amount::new(command.amount)?;

        // An insufficient balance is the one failure that still writes a
        // ledger row: a FAILED record of the attempt, no balance changes.
        // The row carries no engine timestamp; the store clock applies.
        if !sender.balance().is_sufficient_for(&amount) {
            let failed = TransactionDraft::failed(
                command.from_account.clone(),
                command.to_account.clone(),
                amount.clone(),
            );
            self.store
                .commit(WriteBatch::new().insert_transaction(failed))
                .await?;
            tracing::warn!(
                from = %command.from_account,
                to = %command.to_account,
                amount = %amount,
                "transfer rejected: insufficient funds"
            );
            return Err(LedgerError::InsufficientFunds {
                available: sender.balance().clone(),
                requested: amount,
            });
        }

        // The row's timestamp also anchors the velocity window, so it is
        // fixed before scoring.
        let now = Utc::now();
        let draft = TransactionDraft::success(
            command.from_account.clone(),
            command.to_account.clone(),
            amount.clone(),
        )
        .at(now);

        // Score against committed history. The verdict is advisory: it is
        // attached to the row before commit but never blocks the movement.
        let verdict = self
            .fraud
            .evaluate(&command.from_account, &amount, now)
            .await?;
        if verdict.is_flagged() {
            tracing::warn!(
                from = %command.from_account,
                amount = %amount,
                reason = verdict.reason().unwrap_or_default(),
                "transfer flagged by fraud rules"
            );
        }
        let draft = draft.with_verdict(verdict);

        let batch = if command.from_account == command.to_account {
            // Sending to oneself nets out; commit the single account once so
            // the version check sees one update, not two stacked ones.
            let unchanged = sender.debit(&amount)?.credit(&amount)?;
            WriteBatch::new()
                .update_account(unchanged)
                .insert_transaction(draft)
        } else {
            let debited = sender.debit(&amount)?;
            let credited = receiver.credit(&amount)?;
            WriteBatch::new()
                .update_account(debited)
                .update_account(credited)
                .insert_transaction(draft)
        };

        let row = self
            .store
            .commit(batch)
            .await?
            .single_transaction()
            .ok_or_else(|| {
                LedgerError::Store(StoreError::Backend(
                    "commit returned no transaction row".to_string(),
                ))
            })?;

        tracing::info!(
            id = %row.id(),
            from = %row.from_account(),
            to = %row.to_account(),
            amount = %row.amount(),
            fraud = row.is_fraud(),
            "transfer completed"
        );
        Ok(row)
    }
}
