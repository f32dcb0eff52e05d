//! Account Engine
//!
//! Account opening with random 10-digit number allocation. Candidates are
//! drawn, checked for existence, and inserted; the store re-checks number
//! and owner uniqueness at commit, which closes the race between the
//! existence check and the insert. A commit-time collision just consumes
//! another attempt.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Account, AccountNumber, NewAccount};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, StoreError, WriteBatch};

/// Attempt bound for number allocation. The code space holds a billion
/// numbers, so hitting this means the store is pathologically full or the
/// RNG is broken.
const MAX_ALLOCATION_ATTEMPTS: u32 = 32;

/// Engine for opening accounts
pub struct AccountEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> AccountEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Open an account for `owner` with a fresh unique number and a zero
    /// starting balance. A user holds at most one account.
    pub async fn open_account(&self, owner: Uuid) -> LedgerResult<Account> {
        if self.store.account_by_owner(owner).await?.is_some() {
            return Err(LedgerError::DuplicateAccount(owner));
        }

        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let number = AccountNumber::random(&mut rand::thread_rng());
            if self.store.account_number_exists(&number).await? {
                continue;
            }

            let batch = WriteBatch::new().insert_account(NewAccount::new(number, owner));
            match self.store.commit(batch).await {
                Ok(outcome) => {
                    let account = outcome.single_account().ok_or_else(|| {
                        LedgerError::Store(StoreError::Backend(
                            "commit returned no account".to_string(),
                        ))
                    })?;
                    tracing::info!(
                        owner = %owner,
                        number = %account.number(),
                        "account opened"
                    );
                    return Ok(account);
                }
                // Lost the draw to a concurrent insert: redraw.
                Err(StoreError::AccountNumberTaken(_)) => continue,
                Err(StoreError::OwnerHasAccount(owner)) => {
                    return Err(LedgerError::DuplicateAccount(owner));
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(LedgerError::AccountNumbersExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }
}
