//! Account entity
//!
//! Accounts are identified by a 10-digit zero-padded account number and hold
//! a single non-negative balance. Each account belongs to exactly one owner,
//! and an owner has at most one account (enforced by the store at commit).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::money::{Amount, AmountError, Balance};

/// Number of digits in an account number
const ACCOUNT_NUMBER_LEN: usize = 10;

/// Size of the account-number code space. Candidates are drawn from
/// `[0, CODE_SPACE)` and zero-padded, so the leading digit of a generated
/// number is always zero.
const CODE_SPACE: u32 = 1_000_000_000;

/// A validated 10-digit zero-padded account number.
///
/// Orders by its digit string, which is a numeric order thanks to the
/// zero-padding; the lock registry relies on this for deadlock-free
/// pair acquisition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

/// Errors that can occur when parsing an account number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountNumberError {
    #[error("Account number must be exactly {ACCOUNT_NUMBER_LEN} digits (got {0})")]
    WrongLength(usize),

    #[error("Account number must contain only digits")]
    NonDigit,
}

impl AccountNumber {
    /// Validate and wrap a 10-digit account number.
    pub fn new(number: impl Into<String>) -> Result<Self, AccountNumberError> {
        let number = number.into();
        if number.len() != ACCOUNT_NUMBER_LEN {
            return Err(AccountNumberError::WrongLength(number.len()));
        }
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountNumberError::NonDigit);
        }
        Ok(Self(number))
    }

    /// Draw a random candidate from the code space, zero-padded to 10 digits.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let candidate = rng.gen_range(0..CODE_SPACE);
        Self(format!("{:010}", candidate))
    }

    /// The number as its canonical digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountNumber::new(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccountNumber::new(value)
    }
}

impl From<AccountNumber> for String {
    fn from(number: AccountNumber) -> Self {
        number.0
    }
}

/// A persisted account.
///
/// `id` and `version` are store-assigned: the id on insert, the version bumped
/// on each committed update. Balance mutation goes through `debit`/`credit`,
/// which return the mutated copy; the original value stays untouched so a
/// failed validation leaves nothing to roll back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: Uuid,
    number: AccountNumber,
    owner: Uuid,
    balance: Balance,
    version: u64,
}

impl Account {
    /// Reconstruct an account from stored state. Used by store
    /// implementations; engines never build accounts directly.
    pub fn from_parts(
        id: Uuid,
        number: AccountNumber,
        owner: Uuid,
        balance: Balance,
        version: u64,
    ) -> Self {
        Self {
            id,
            number,
            owner,
            balance,
            version,
        }
    }

    /// Withdraw `amount`, returning the updated account.
    ///
    /// Fails if the balance does not cover the amount; callers that need the
    /// insufficient-funds business flow check `balance().is_sufficient_for`
    /// first and treat a failure here as unreachable.
    pub fn debit(&self, amount: &Amount) -> Result<Account, AmountError> {
        let balance = self.balance.debit(amount)?;
        Ok(Self {
            balance,
            ..self.clone()
        })
    }

    /// Deposit `amount`, returning the updated account.
    pub fn credit(&self, amount: &Amount) -> Result<Account, AmountError> {
        let balance = self.balance.credit(amount)?;
        Ok(Self {
            balance,
            ..self.clone()
        })
    }

    /// Check whether `user` owns this account.
    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.owner == user
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Payload for inserting a new account. The store assigns the id and the
/// initial version at commit. Engines always open accounts at balance zero;
/// test harnesses may seed a funded balance directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub number: AccountNumber,
    pub owner: Uuid,
    pub balance: Balance,
}

impl NewAccount {
    pub fn new(number: AccountNumber, owner: Uuid) -> Self {
        Self {
            number,
            owner,
            balance: Balance::zero(),
        }
    }

    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = balance;
        self
    }
}
