//! Bank policy configuration
//!
//! Limits, rates and credential settings. Every field has a default, so a
//! policy file only needs to name what it overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or checking a policy
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Cannot read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse policy file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid policy: {0}")]
    Invalid(String),
}

/// Policy applied by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankPolicy {
    // === Ledger ===
    /// Largest amount a single transfer may move
    #[serde(default = "default_transfer_limit")]
    pub transfer_limit: Decimal,

    // === Credit ===
    /// Maximum credit = primary balance * multiplier
    #[serde(default = "default_credit_multiplier")]
    pub credit_multiplier: Decimal,

    /// Share of the maximum credit that active loans may already occupy
    #[serde(default = "default_active_loan_share")]
    pub active_loan_share: Decimal,

    // === Savings ===
    /// Annual savings rate in percent, fixed per account at open time
    #[serde(default = "default_savings_rate")]
    pub savings_rate: Decimal,

    // === Registration ===
    #[serde(default = "default_opening_balance")]
    pub opening_balance: Decimal,

    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,

    #[serde(default = "default_card_validity_years")]
    pub card_validity_years: i32,

    // === Credentials ===
    /// Failed logins before the account is locked
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,

    #[serde(default = "default_password_salt")]
    pub password_salt: String,

    #[serde(default = "default_temp_password_length")]
    pub temp_password_length: usize,
}

fn default_transfer_limit() -> Decimal {
    Decimal::new(50_000, 0)
}

fn default_credit_multiplier() -> Decimal {
    Decimal::new(10, 0)
}

fn default_active_loan_share() -> Decimal {
    Decimal::new(5, 1)
}

fn default_savings_rate() -> Decimal {
    Decimal::new(55, 1)
}

fn default_opening_balance() -> Decimal {
    Decimal::new(1_000, 0)
}

fn default_minimum_age() -> u32 {
    18
}

fn default_card_validity_years() -> i32 {
    5
}

fn default_max_failed_attempts() -> u32 {
    5
}

fn default_password_salt() -> String {
    "bank_salt_v2_".to_string()
}

fn default_temp_password_length() -> usize {
    8
}

impl Default for BankPolicy {
    fn default() -> Self {
        Self {
            transfer_limit: default_transfer_limit(),
            credit_multiplier: default_credit_multiplier(),
            active_loan_share: default_active_loan_share(),
            savings_rate: default_savings_rate(),
            opening_balance: default_opening_balance(),
            minimum_age: default_minimum_age(),
            card_validity_years: default_card_validity_years(),
            max_failed_attempts: default_max_failed_attempts(),
            password_salt: default_password_salt(),
            temp_password_length: default_temp_password_length(),
        }
    }
}

impl BankPolicy {
    /// Load a policy from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path)?;
        let policy: Self = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.transfer_limit <= Decimal::ZERO {
            return Err(PolicyError::Invalid(
                "transfer_limit must be positive".to_string(),
            ));
        }
        if self.credit_multiplier <= Decimal::ZERO {
            return Err(PolicyError::Invalid(
                "credit_multiplier must be positive".to_string(),
            ));
        }
        if self.active_loan_share <= Decimal::ZERO || self.active_loan_share > Decimal::ONE {
            return Err(PolicyError::Invalid(
                "active_loan_share must be in (0, 1]".to_string(),
            ));
        }
        if self.savings_rate < Decimal::ZERO {
            return Err(PolicyError::Invalid(
                "savings_rate cannot be negative".to_string(),
            ));
        }
        if self.opening_balance < Decimal::ZERO {
            return Err(PolicyError::Invalid(
                "opening_balance cannot be negative".to_string(),
            ));
        }
        if self.max_failed_attempts == 0 {
            return Err(PolicyError::Invalid(
                "max_failed_attempts must be at least 1".to_string(),
            ));
        }
        if self.temp_password_length < 4 {
            return Err(PolicyError::Invalid(
                "temp_password_length must be at least 4".to_string(),
            ));
        }
        if self.card_validity_years <= 0 {
            return Err(PolicyError::Invalid(
                "card_validity_years must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder method for the transfer ceiling
    pub fn with_transfer_limit(mut self, limit: Decimal) -> Self {
        self.transfer_limit = limit;
        self
    }

    pub fn with_opening_balance(mut self, amount: Decimal) -> Self {
        self.opening_balance = amount;
        self
    }

    pub fn with_max_failed_attempts(mut self, attempts: u32) -> Self {
        self.max_failed_attempts = attempts;
        self
    }

    /// Credit ceiling for a given primary balance, `None` when it does not fit a `Decimal`
    pub fn max_credit(&self, primary_balance: Decimal) -> Option<Decimal> {
        primary_balance.checked_mul(self.credit_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy() {
        let policy = BankPolicy::default();
        assert_eq!(policy.transfer_limit, dec!(50000));
        assert_eq!(policy.credit_multiplier, dec!(10));
        assert_eq!(policy.active_loan_share, dec!(0.5));
        assert_eq!(policy.savings_rate, dec!(5.5));
        assert_eq!(policy.opening_balance, dec!(1000));
        assert_eq!(policy.max_failed_attempts, 5);
        assert_eq!(policy.password_salt, "bank_salt_v2_");
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: BankPolicy =
            serde_json::from_str(r#"{ "transfer_limit": "1000", "max_failed_attempts": 3 }"#)
                .unwrap();
        assert_eq!(policy.transfer_limit, dec!(1000));
        assert_eq!(policy.max_failed_attempts, 3);
        assert_eq!(policy.savings_rate, dec!(5.5));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let policy = BankPolicy::default().with_transfer_limit(Decimal::ZERO);
        assert!(matches!(policy.validate(), Err(PolicyError::Invalid(_))));

        let policy = BankPolicy::default().with_max_failed_attempts(0);
        assert!(policy.validate().is_err());

        let mut policy = BankPolicy::default();
        policy.active_loan_share = dec!(1.5);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, r#"{ "savings_rate": "7.25" }"#).unwrap();

        let policy = BankPolicy::from_file(&path).unwrap();
        assert_eq!(policy.savings_rate, dec!(7.25));

        std::fs::write(&path, r#"{ "credit_multiplier": "-1" }"#).unwrap();
        assert!(BankPolicy::from_file(&path).is_err());
    }

    #[test]
    fn test_max_credit() {
        let policy = BankPolicy::default();
        assert_eq!(policy.max_credit(dec!(1000)), Some(dec!(10000)));
        assert_eq!(policy.max_credit(Decimal::MAX), None);
    }
}
