//! Per-account serialization
//!
//! Balance mutation is a read-modify-write over store state, so every
//! transfer or deposit holds the lock(s) of the accounts it touches for its
//! whole read-validate-mutate-commit span. Pairs are always acquired in
//! ascending account-number order, which makes opposite-direction transfers
//! between the same two accounts queue up instead of deadlocking.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::AccountNumber;

/// Registry of one async mutex per account number.
///
/// Entries are created on first use and never evicted; the registry grows
/// with the set of accounts that have moved funds.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountNumber, Arc<Mutex<()>>>>,
}

/// Guards for the account pair of a transfer. The second slot is empty for
/// self-transfers, which take their account's lock once.
pub type PairGuard = (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>);

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, number: &AccountNumber) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(number.clone()).or_default())
    }

    /// Lock a single account for the lifetime of the returned guard.
    pub async fn lock(&self, number: &AccountNumber) -> OwnedMutexGuard<()> {
        self.entry(number).await.lock_owned().await
    }

    /// Lock two accounts, lower account number first.
    pub async fn lock_pair(&self, a: &AccountNumber, b: &AccountNumber) -> PairGuard {
        if a == b {
            return (self.lock(a).await, None);
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.lock(first).await;
        let second_guard = self.lock(second).await;
        (first_guard, Some(second_guard))
    }
}
