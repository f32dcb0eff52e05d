//! In-memory ledger store
//!
//! Reference [`LedgerStore`] implementation backing tests and local runs.
//! A commit clones the current state, applies every write against the clone
//! with full validation, and swaps the clone in only when the whole batch
//! succeeded. A failed write therefore leaves the store exactly as it was.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Account, AccountNumber, Transaction, TransactionDraft};

use super::error::StoreError;
use super::ledger::{CommitOutcome, LedgerStore, LedgerWrite, WriteBatch};

/// Accounts start at this version on insert; every committed update bumps
/// the stored version by one.
const INITIAL_VERSION: u64 = 1;

#[derive(Debug, Clone, Default)]
struct Inner {
    accounts: HashMap<AccountNumber, Account>,
    owners: HashMap<Uuid, AccountNumber>,
    transactions: Vec<Transaction>,
    transaction_index: HashMap<Uuid, usize>,
}

impl Inner {
    fn apply(&mut self, write: LedgerWrite, outcome: &mut CommitOutcome) -> Result<(), StoreError> {
        match write {
            LedgerWrite::InsertAccount(new_account) => {
                if self.accounts.contains_key(&new_account.number) {
                    return Err(StoreError::AccountNumberTaken(new_account.number));
                }
                if self.owners.contains_key(&new_account.owner) {
                    return Err(StoreError::OwnerHasAccount(new_account.owner));
                }
                let account = Account::from_parts(
                    Uuid::new_v4(),
                    new_account.number.clone(),
                    new_account.owner,
                    new_account.balance,
                    INITIAL_VERSION,
                );
                self.owners.insert(account.owner(), new_account.number.clone());
                self.accounts.insert(new_account.number, account.clone());
                outcome.accounts.push(account);
            }
            LedgerWrite::UpdateAccount {
                account,
                expected_version,
            } => {
                let stored = self
                    .accounts
                    .get(account.number())
                    .ok_or_else(|| StoreError::UnknownAccount(account.number().clone()))?;
                if stored.version() != expected_version {
                    return Err(StoreError::VersionConflict {
                        account: account.number().clone(),
                        expected: expected_version,
                        found: stored.version(),
                    });
                }
                let updated = Account::from_parts(
                    stored.id(),
                    account.number().clone(),
                    account.owner(),
                    account.balance().clone(),
                    expected_version + 1,
                );
                self.accounts.insert(updated.number().clone(), updated.clone());
                outcome.accounts.push(updated);
            }
            LedgerWrite::InsertTransaction(draft) => {
                let row = self.insert_transaction(draft)?;
                outcome.transactions.push(row);
            }
            LedgerWrite::SetFraudStatus {
                transaction_id,
                is_fraud,
                fraud_reason,
            } => {
                let index = *self
                    .transaction_index
                    .get(&transaction_id)
                    .ok_or(StoreError::UnknownTransaction(transaction_id))?;
                let updated = self.transactions[index]
                    .clone()
                    .with_fraud_status(is_fraud, fraud_reason);
                self.transactions[index] = updated.clone();
                outcome.transactions.push(updated);
            }
        }
        Ok(())
    }

    fn insert_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, StoreError> {
        // Both sides must reference held accounts, like a foreign key would
        // enforce. Deposits reference the same account twice.
        for number in [draft.from_account(), draft.to_account()] {
            if !self.accounts.contains_key(number) {
                return Err(StoreError::UnknownAccount(number.clone()));
            }
        }
        let id = Uuid::new_v4();
        let timestamp = draft.timestamp().unwrap_or_else(Utc::now);
        let row = Transaction::from_parts(
            id,
            draft.from_account().clone(),
            draft.to_account().clone(),
            draft.amount().clone(),
            timestamp,
            draft.status(),
            draft.is_fraud(),
            draft.fraud_reason().map(str::to_owned),
        );
        self.transaction_index.insert(id, self.transactions.len());
        self.transactions.push(row.clone());
        Ok(row)
    }
}

/// Thread-safe in-memory ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<Inner>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn account_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(number).cloned())
    }

    async fn account_by_owner(&self, owner: Uuid) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .owners
            .get(&owner)
            .and_then(|number| inner.accounts.get(number))
            .cloned())
    }

    async fn account_number_exists(&self, number: &AccountNumber) -> Result<bool, StoreError> {
        Ok(self.read()?.accounts.contains_key(number))
    }

    async fn transaction_by_id(&self, id: Uuid) -> Result<Option<Transaction>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .transaction_index
            .get(&id)
            .map(|&index| inner.transactions[index].clone()))
    }

    async fn transactions_by_account(
        &self,
        number: &AccountNumber,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .iter()
            .filter(|row| row.from_account() == number || row.to_account() == number)
            .cloned()
            .collect())
    }

    async fn fraud_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .iter()
            .filter(|row| row.is_fraud())
            .cloned()
            .collect())
    }

    async fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.read()?.transactions.clone())
    }

    async fn sent_since(
        &self,
        sender: &AccountNumber,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .iter()
            .filter(|row| row.from_account() == sender && row.timestamp() > cutoff)
            .cloned()
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitOutcome, StoreError> {
        if batch.is_empty() {
            return Ok(CommitOutcome::default());
        }
        let mut inner = self.write()?;
        let mut staged = inner.clone();
        let mut outcome = CommitOutcome::default();
        let write_count = batch.len();
        for write in batch.into_writes() {
            staged.apply(write, &mut outcome)?;
        }
        *inner = staged;
        tracing::debug!(
            writes = write_count,
            accounts = outcome.accounts.len(),
            transactions = outcome.transactions.len(),
            "ledger batch committed"
        );
        Ok(outcome)
    }
}
