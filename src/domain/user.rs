use crate::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::{Add, AddAssign, Sub, SubAssign};
use uuid::Uuid;

/// A wallet balance in the smallest currency unit.
///
/// This is a wrapper around `i64` to enforce domain-specific rules and provide
/// type safety for ledger arithmetic. The currency has no sub-unit precision,
/// so integer arithmetic is exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Balance(pub i64);

/// A positive monetary amount moved by a single operation.
///
/// Ensures that amounts applied to a balance are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(WalletError::Validation(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = WalletError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// SHA-256 digest of a wallet PIN.
///
/// Stand-in for a real credential scheme: the plaintext PIN is never kept,
/// only compared digest-to-digest at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDigest(String);

impl PinDigest {
    pub fn new(pin: &str) -> Self {
        let digest = Sha256::digest(pin.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn matches(&self, pin: &str) -> bool {
        Self::new(pin) == *self
    }
}

/// A registered wallet holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique login and transfer address.
    pub phone_number: String,
    pub pin: PinDigest,
    pub name: String,
    pub balance: Balance,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(phone_number: impl Into<String>, pin: &str, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.into(),
            pin: PinDigest::new(pin),
            name: name.into(),
            balance: Balance::ZERO,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Adds funds to the balance.
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount.into();
    }

    /// Removes funds from the balance if sufficient.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        if self.balance >= amount.into() {
            self.balance -= amount.into();
            Ok(())
        } else {
            Err(WalletError::InsufficientBalance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_arithmetic() {
        let b1 = Balance::new(10_000);
        let b2 = Balance::new(5_000);
        assert_eq!(b1 + b2, Balance::new(15_000));
        assert_eq!(b1 - b2, Balance::new(5_000));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(1).is_ok());
        assert!(matches!(
            Amount::new(0),
            Err(WalletError::Validation(_))
        ));
        assert!(matches!(
            Amount::new(-1),
            Err(WalletError::Validation(_))
        ));
    }

    #[test]
    fn test_user_credit() {
        let mut user = User::new("08123456789", "123456", "Alice");
        user.credit(Amount::new(10_000).unwrap());
        assert_eq!(user.balance, Balance::new(10_000));
    }

    #[test]
    fn test_user_debit_success() {
        let mut user = User::new("08123456789", "123456", "Alice");
        user.balance = Balance::new(10_000);

        let result = user.debit(Amount::new(4_000).unwrap());
        assert!(result.is_ok());
        assert_eq!(user.balance, Balance::new(6_000));
    }

    #[test]
    fn test_user_debit_insufficient() {
        let mut user = User::new("08123456789", "123456", "Alice");
        user.balance = Balance::new(10_000);

        let result = user.debit(Amount::new(20_000).unwrap());
        assert!(matches!(result, Err(WalletError::InsufficientBalance)));
        assert_eq!(user.balance, Balance::new(10_000));
    }

    #[test]
    fn test_pin_digest_never_keeps_plaintext() {
        let digest = PinDigest::new("123456");
        assert!(digest.matches("123456"));
        assert!(!digest.matches("654321"));
        assert!(!format!("{digest:?}").contains("123456"));
    }
}
