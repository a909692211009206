//! Amount - non-negative decimal wrapper for balances
//!
//! Every balance in Minibank is an `Amount`. A balance can therefore never
//! be stored below zero: the only way to lower one is `checked_sub`, which
//! refuses to go negative.

use crate::money::{is_cent_exact, MONEY_SCALE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when building an amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Amount must be greater than zero: {0}")]
    NotPositive(Decimal),

    #[error("Amount {value} has more than {max_scale} decimal places")]
    TooPrecise { value: Decimal, max_scale: u32 },
}

/// A non-negative decimal amount.
///
/// # Invariant
/// The inner value is always >= 0. This is enforced by the constructors.
///
/// # Example
/// ```
/// use minibank_core::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(10050, 2)).unwrap();
/// assert_eq!(amount.to_string(), "100.50");
///
/// assert!(Amount::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Amount from a Decimal.
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            Err(AmountError::NegativeAmount(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Validate a caller-supplied operation amount.
    ///
    /// Operation amounts must be strictly positive and cent-exact.
    pub fn positive(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        if !is_cent_exact(value) {
            return Err(AmountError::TooPrecise {
                value,
                max_scale: MONEY_SCALE,
            });
        }
        Ok(Self(value))
    }

    /// Get the inner Decimal value
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition - returns None on overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction - returns None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        let result = self.0.checked_sub(other.0)?;
        if result < Decimal::ZERO {
            None
        } else {
            Some(Amount(result))
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100)).unwrap();
        assert_eq!(amount.value(), dec!(100));
    }

    #[test]
    fn test_amount_zero() {
        let amount = Amount::new(Decimal::ZERO).unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_amount_negative_rejected() {
        let result = Amount::new(dec!(-100));
        assert!(matches!(result, Err(AmountError::NegativeAmount(_))));
    }

    #[test]
    fn test_operation_amount_must_be_positive() {
        assert!(matches!(
            Amount::positive(Decimal::ZERO),
            Err(AmountError::NotPositive(_))
        ));
        assert!(matches!(
            Amount::positive(dec!(-5)),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn test_operation_amount_must_be_cent_exact() {
        assert!(matches!(
            Amount::positive(dec!(10.001)),
            Err(AmountError::TooPrecise { .. })
        ));
        // Trailing zeros are not extra precision
        assert!(Amount::positive(dec!(10.500)).is_ok());
    }

    #[test]
    fn test_checked_sub_prevents_negative() {
        let a = Amount::new(dec!(50)).unwrap();
        let b = Amount::new(dec!(100)).unwrap();
        assert!(a.checked_sub(&b).is_none());
    }

    #[test]
    fn test_checked_sub_success() {
        let a = Amount::new(dec!(100)).unwrap();
        let b = Amount::new(dec!(30)).unwrap();
        assert_eq!(a.checked_sub(&b).unwrap().value(), dec!(70));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::new(dec!(5)).unwrap().to_string(), "5.00");
        assert_eq!(Amount::new(dec!(1234.5)).unwrap().to_string(), "1234.50");
    }

    #[test]
    fn test_serde_roundtrip() {
        let amount = Amount::new(dec!(123.45)).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"123.45\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(amount, parsed);
    }

    #[test]
    fn test_deserialize_negative_rejected() {
        let parsed: Result<Amount, _> = serde_json::from_str("\"-1.00\"");
        assert!(parsed.is_err());
    }
}
