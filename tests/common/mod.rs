//! Common test utilities

use std::sync::Arc;

use corebank::store::{InMemoryLedger, LedgerStore, WriteBatch};
use corebank::{Account, AccountNumber, Balance, NewAccount};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Parse a ten-digit account number literal.
pub fn number(s: &str) -> AccountNumber {
    s.parse().expect("valid account number literal")
}

/// Seed a funded account directly at the store. Seeding this way leaves no
/// ledger rows behind; a deposit would count against the sender's velocity
/// window in later assertions.
pub async fn seed_account(
    store: &Arc<InMemoryLedger>,
    account_number: &str,
    owner: Uuid,
    balance: Decimal,
) -> Account {
    store
        .commit(
            WriteBatch::new().insert_account(
                NewAccount::new(number(account_number), owner)
                    .with_balance(Balance::new(balance).expect("valid seed balance")),
            ),
        )
        .await
        .expect("seed commit failed")
        .single_account()
        .expect("seed commit returned no account")
}

/// Committed balance of an account.
pub async fn balance_of(store: &Arc<InMemoryLedger>, account_number: &str) -> Decimal {
    store
        .account_by_number(&number(account_number))
        .await
        .expect("balance lookup failed")
        .expect("account not found")
        .balance()
        .value()
}
