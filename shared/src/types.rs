//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host primary key of a part
pub type PartId = i32;

/// Host primary key of a stock location
pub type LocationId = i32;

/// ISO-4217 currency code, always three upper-case ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid currency code: {0:?}")]
pub struct CurrencyCodeError(pub String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, CurrencyCodeError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyCodeError(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when two amounts in different currencies are combined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Currency mismatch: {left} vs {right}")]
pub struct CurrencyMismatch {
    pub left: CurrencyCode,
    pub right: CurrencyCode,
}

/// A monetary amount tagged with its currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Money {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// A zero amount counts as "no price" in the host
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Add amounts if same currency
    pub fn checked_add(&self, other: &Money) -> Result<Money, CurrencyMismatch> {
        if !self.same_currency(other) {
            return Err(CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(Money::new(self.amount + other.amount, self.currency.clone()))
    }

    /// Unit price times quantity
    pub fn times(&self, quantity: Decimal) -> Money {
        Money::new(self.amount * quantity, self.currency.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}
