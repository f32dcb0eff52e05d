//! Deposit Engine
//!
//! Single-account credits. Validation failures write nothing, unlike the
//! transfer engine's insufficient-funds path, and deposits are never fraud
//! scored.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Amount, Transaction, TransactionDraft};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, StoreError, WriteBatch};

use super::commands::DepositCommand;
use super::locks::AccountLocks;

/// Engine for crediting a single account
pub struct DepositEngine<S> {
    store: Arc<S>,
    locks: Arc<AccountLocks>,
}

impl<S: LedgerStore> DepositEngine<S> {
    pub fn new(store: Arc<S>, locks: Arc<AccountLocks>) -> Self {
        Self { store, locks }
    }

    /// Execute the deposit command. On success the credited balance and a
    /// SUCCESS row with the account on both sides commit as one batch.
    pub async fn execute(&self, command: DepositCommand) -> LedgerResult<Transaction> {
        let _guard = self.locks.lock(&command.account).await;

        // Account must exist
        let account = self
            .store
            .account_by_number(&command.account)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(command.account.clone()))?;

        // Account must belong to the requesting user
        if !account.is_owned_by(command.requested_by) {
            return Err(LedgerError::Unauthorized {
                account: command.account.clone(),
            });
        }

        // Amount must be strictly positive and well-formed
        let amount = Amount::new(command.amount)?;

        let credited = account.credit(&amount)?;
        let draft = TransactionDraft::success(
            command.account.clone(),
            command.account.clone(),
            amount.clone(),
        )
        .at(Utc::now());

        let row = self
            .store
            .commit(
                WriteBatch::new()
                    .update_account(credited)
                    .insert_transaction(draft),
            )
            .await?
            .single_transaction()
            .ok_or_else(|| {
                LedgerError::Store(StoreError::Backend(
                    "commit returned no transaction row".to_string(),
                ))
            })?;

        tracing::info!(
            id = %row.id(),
            account = %row.to_account(),
            amount = %row.amount(),
            "deposit completed"
        );
        Ok(row)
    }
}
