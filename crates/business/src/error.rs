//! Business layer errors
//!
//! Every engine operation reports failure through [`BankError`]. Validation
//! runs before any mutation, so an `Err` always means nothing changed,
//! except for [`BankError::Persistence`], which is raised after the
//! in-memory state was already committed.

use minibank_core::{AmountError, LoanError};
use minibank_persistence::PersistenceError;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// One failed registration check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationIssue {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid email address")]
    InvalidEmail,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid phone number")]
    InvalidPhone,

    #[error("password must contain {0}")]
    WeakPassword(PasswordRule),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("birth date must be YYYY-MM-DD")]
    InvalidBirthDate,

    #[error("holder must be at least {minimum_age} years old")]
    Underage { minimum_age: u32 },
}

/// Password strength rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PasswordRule::MinLength => "at least 8 characters",
            PasswordRule::Uppercase => "an uppercase letter",
            PasswordRule::Lowercase => "a lowercase letter",
            PasswordRule::Digit => "a digit",
            PasswordRule::Special => "a special character",
        };
        f.write_str(text)
    }
}

fn join_issues(issues: &[RegistrationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Engine errors
#[derive(Debug, Error)]
pub enum BankError {
    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Cannot transfer to the same account")]
    SelfTransfer,

    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    #[error("Transfer of {amount} exceeds the limit of {limit}")]
    LimitExceeded { amount: Decimal, limit: Decimal },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid registration: {}", join_issues(.0))]
    InvalidRegistration(Vec<RegistrationIssue>),

    // === Credential errors ===
    #[error("Account locked: {0}")]
    AccountLocked(String),

    #[error("Invalid credentials, {attempts_left} attempt(s) left")]
    InvalidCredential { attempts_left: u32 },

    // === Credit errors ===
    #[error("Requested credit {requested} exceeds the maximum of {maximum}")]
    CreditLimitExceeded { requested: Decimal, maximum: Decimal },

    #[error("Active loans {outstanding} exceed the allowed {allowed}")]
    ActiveLoanConflict {
        outstanding: Decimal,
        allowed: Decimal,
    },

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    #[error(transparent)]
    InvalidLoanTransition(#[from] LoanError),

    // === Not found / state errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Savings account not open for {0}")]
    SavingsNotOpen(String),

    // === Wrapped errors ===
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for engine operations
pub type BankResult<T> = Result<T, BankError>;

impl From<AmountError> for BankError {
    fn from(err: AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}

impl BankError {
    /// Create insufficient funds error
    pub fn insufficient_funds(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    pub fn limit_exceeded(amount: Decimal, limit: Decimal) -> Self {
        Self::LimitExceeded { amount, limit }
    }

    pub fn account_not_found(id: &str) -> Self {
        Self::AccountNotFound(id.to_string())
    }

    /// Rejected input; state was not touched
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InsufficientFunds { .. }
                | Self::SelfTransfer
                | Self::RecipientNotFound(_)
                | Self::LimitExceeded { .. }
                | Self::InvalidInput(_)
                | Self::InvalidRegistration(_)
                | Self::CreditLimitExceeded { .. }
                | Self::ActiveLoanConflict { .. }
        )
    }

    /// The mutation was applied in memory but could not be saved
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_error() {
        let err = BankError::insufficient_funds(dec!(100), dec!(50));
        assert!(err.to_string().contains("required 100"));
        assert!(err.to_string().contains("available 50"));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_registration_issues_are_listed() {
        let err = BankError::InvalidRegistration(vec![
            RegistrationIssue::InvalidEmail,
            RegistrationIssue::WeakPassword(PasswordRule::Digit),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("invalid email address"));
        assert!(msg.contains("password must contain a digit"));
    }

    #[test]
    fn test_amount_error_maps_to_invalid_amount() {
        let err: BankError = AmountError::NotPositive(dec!(0)).into();
        assert!(matches!(err, BankError::InvalidAmount(_)));
    }

    #[test]
    fn test_persistence_failure_predicate() {
        let err: BankError = PersistenceError::Unavailable("down".to_string()).into();
        assert!(err.is_persistence_failure());
        assert!(!err.is_validation_error());
    }
}
