//! Bank facade
//!
//! One entry point wiring every engine over a shared store and a single
//! account-lock registry. Sharing the registry is what serializes a
//! transfer against a concurrent deposit on the same account; callers that
//! assemble engines by hand must do the same.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Account, AccountNumber, Transaction};
use crate::engine::{
    AccountEngine, AccountLocks, DepositCommand, DepositEngine, FraudReviewEngine, LedgerQueries,
    ReviewCommand, TransferCommand, TransferEngine,
};
use crate::error::LedgerResult;
use crate::store::LedgerStore;

/// Ledger-backed funds-transfer engine with inline fraud screening
pub struct CoreBank<S> {
    accounts: AccountEngine<S>,
    transfers: TransferEngine<S>,
    deposits: DepositEngine<S>,
    reviews: FraudReviewEngine<S>,
    queries: LedgerQueries<S>,
}

impl<S: LedgerStore> CoreBank<S> {
    pub fn new(store: Arc<S>) -> Self {
        let locks = Arc::new(AccountLocks::new());
        Self {
            accounts: AccountEngine::new(Arc::clone(&store)),
            transfers: TransferEngine::new(Arc::clone(&store), Arc::clone(&locks)),
            deposits: DepositEngine::new(Arc::clone(&store), locks),
            reviews: FraudReviewEngine::new(Arc::clone(&store)),
            queries: LedgerQueries::new(store),
        }
    }

    /// Open an account for `owner` with a fresh unique number.
    pub async fn open_account(&self, owner: Uuid) -> LedgerResult<Account> {
        self.accounts.open_account(owner).await
    }

    /// Move funds between accounts. Returns the committed ledger row,
    /// fraud verdict included.
    pub async fn transfer(&self, command: TransferCommand) -> LedgerResult<Transaction> {
        self.transfers.execute(command).await
    }

    /// Credit a single account. Deposits are never fraud scored.
    pub async fn deposit(&self, command: DepositCommand) -> LedgerResult<Transaction> {
        self.deposits.execute(command).await
    }

    /// Override a transaction's fraud verdict.
    pub async fn review(&self, command: ReviewCommand) -> LedgerResult<Transaction> {
        self.reviews.execute(command).await
    }

    pub async fn account_by_number(
        &self,
        account_number: &AccountNumber,
    ) -> LedgerResult<Option<Account>> {
        self.queries.account_by_number(account_number).await
    }

    pub async fn account_for_owner(&self, owner: Uuid) -> LedgerResult<Option<Account>> {
        self.queries.account_for_owner(owner).await
    }

    pub async fn transactions_for_owner(&self, owner: Uuid) -> LedgerResult<Vec<Transaction>> {
        self.queries.transactions_for_owner(owner).await
    }

    pub async fn all_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        self.queries.all_transactions().await
    }

    pub async fn fraud_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        self.queries.fraud_transactions().await
    }
}
