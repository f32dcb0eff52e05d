//! Ledger queries
//!
//! Read-only views over committed state. No locks: a query sees whatever
//! was committed when it ran.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Account, AccountNumber, Transaction};
use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

/// Read-side access to accounts and the transaction ledger
pub struct LedgerQueries<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> LedgerQueries<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn account_by_number(
        &self,
        number: &AccountNumber,
    ) -> LedgerResult<Option<Account>> {
        Ok(self.store.account_by_number(number).await?)
    }

    pub async fn account_for_owner(&self, owner: Uuid) -> LedgerResult<Option<Account>> {
        Ok(self.store.account_by_owner(owner).await?)
    }

    /// Every row with the owner's account on either side, in ledger order.
    pub async fn transactions_for_owner(&self, owner: Uuid) -> LedgerResult<Vec<Transaction>> {
        let account = self
            .store
            .account_by_owner(owner)
            .await?
            .ok_or(LedgerError::NoAccountForOwner(owner))?;
        Ok(self.store.transactions_by_account(account.number()).await?)
    }

    /// The full ledger, in insertion order.
    pub async fn all_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.store.all_transactions().await?)
    }

    /// Rows currently flagged as fraud.
    pub async fn fraud_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.store.fraud_transactions().await?)
    }
}
