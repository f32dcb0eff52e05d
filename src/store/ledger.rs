//! Ledger storage port
//!
//! Engines talk to storage exclusively through [`LedgerStore`]. Reads return
//! committed state only; mutations go through [`WriteBatch`], which a store
//! applies atomically: either every write lands or none do. That batch
//! boundary is what keeps a transfer's debit, credit, and ledger row from
//! ever being observed half-applied.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Account, AccountNumber, NewAccount, Transaction, TransactionDraft};

use super::error::StoreError;

/// A single write within a batch.
///
/// Account updates carry the version the caller loaded; a store must reject
/// the whole batch with [`StoreError::VersionConflict`] when the stored
/// version differs. Fraud status is the only field of a committed
/// transaction a write can touch.
#[derive(Debug, Clone)]
pub enum LedgerWrite {
    /// Create an account. The store assigns the id and the initial version.
    InsertAccount(NewAccount),
    /// Replace an account's state, guarded by its expected version.
    UpdateAccount {
        account: Account,
        expected_version: u64,
    },
    /// Append a ledger row. The store assigns the id, and the current time
    /// when the draft carries no timestamp.
    InsertTransaction(TransactionDraft),
    /// Overwrite the fraud fields of an existing row.
    SetFraudStatus {
        transaction_id: Uuid,
        is_fraud: bool,
        fraud_reason: Option<String>,
    },
}

/// An ordered, all-or-nothing set of writes.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<LedgerWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(mut self, account: NewAccount) -> Self {
        self.writes.push(LedgerWrite::InsertAccount(account));
        self
    }

    /// Stage an account update. The expected version is taken from the
    /// account itself, so callers must pass the state they derived from the
    /// loaded account without reloading in between.
    pub fn update_account(mut self, account: Account) -> Self {
        let expected_version = account.version();
        self.writes.push(LedgerWrite::UpdateAccount {
            account,
            expected_version,
        });
        self
    }

    pub fn insert_transaction(mut self, draft: TransactionDraft) -> Self {
        self.writes.push(LedgerWrite::InsertTransaction(draft));
        self
    }

    pub fn set_fraud_status(
        mut self,
        transaction_id: Uuid,
        is_fraud: bool,
        fraud_reason: Option<String>,
    ) -> Self {
        self.writes.push(LedgerWrite::SetFraudStatus {
            transaction_id,
            is_fraud,
            fraud_reason,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn into_writes(self) -> Vec<LedgerWrite> {
        self.writes
    }
}

/// Post-commit state of everything a batch touched, in write order.
#[derive(Debug, Clone, Default)]
pub struct CommitOutcome {
    /// Inserted and updated accounts, as stored.
    pub accounts: Vec<Account>,
    /// Inserted and fraud-updated rows, as stored.
    pub transactions: Vec<Transaction>,
}

impl CommitOutcome {
    /// The single row a batch produced. Engines that commit exactly one
    /// ledger row use this to get the stored copy back.
    pub fn single_transaction(self) -> Option<Transaction> {
        if self.transactions.len() == 1 {
            self.transactions.into_iter().next()
        } else {
            None
        }
    }

    /// The single account a batch produced.
    pub fn single_account(self) -> Option<Account> {
        if self.accounts.len() == 1 {
            self.accounts.into_iter().next()
        } else {
            None
        }
    }
}

/// Storage port for accounts and the transaction ledger.
///
/// Reads see committed state only. `sent_since` drives the velocity fraud
/// rule: it must return rows whose sending side is the given account and
/// whose timestamp is strictly after the cutoff, regardless of row status.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn account_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError>;

    async fn account_by_owner(&self, owner: Uuid) -> Result<Option<Account>, StoreError>;

    async fn account_number_exists(&self, number: &AccountNumber) -> Result<bool, StoreError>;

    async fn transaction_by_id(&self, id: Uuid) -> Result<Option<Transaction>, StoreError>;

    /// Rows where the account appears on either side, in insertion order.
    async fn transactions_by_account(
        &self,
        number: &AccountNumber,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Rows currently flagged as fraud, in insertion order.
    async fn fraud_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Every row in the ledger, in insertion order.
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Rows sent from the account strictly after the cutoff instant.
    async fn sent_since(
        &self,
        sender: &AccountNumber,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Apply a batch atomically and return the stored state of everything
    /// it wrote.
    async fn commit(&self, batch: WriteBatch) -> Result<CommitOutcome, StoreError>;
}
