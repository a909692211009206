//! # Account Module
//!
//! Account - one customer of the bank, keyed by email.
//! Holds the primary balance, an optional savings sub-account, the loan
//! applications and the account's own transaction log.

use crate::amount::Amount;
use crate::loan::LoanApplication;
use crate::transaction::{TransactionLog, TransactionRecord};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and contact details. Not ledger relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Login state of an account.
///
/// Only the credential guard mutates this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Hex SHA-256 of salt + password
    pub password_hash: String,
    pub failed_attempts: u32,
    /// False once locked out
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(password_hash: String) -> Self {
        Self {
            password_hash,
            failed_attempts: 0,
            active: true,
            last_login: None,
            registered_at: Utc::now(),
        }
    }
}

/// Debit card issued with the primary account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: String,
    pub cvv: String,
    pub expires_on: NaiveDate,
}

impl Card {
    /// `**** **** **** 1234`
    pub fn masked(&self) -> String {
        let tail = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or_default();
        format!("**** **** **** {}", tail)
    }
}

/// Interest-bearing secondary balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub balance: Amount,
    /// Annual rate in percent, fixed when opened
    pub rate: Decimal,
    pub opened_on: NaiveDate,
}

impl SavingsAccount {
    pub fn new(rate: Decimal, opened_on: NaiveDate) -> Self {
        Self {
            balance: Amount::ZERO,
            rate,
            opened_on,
        }
    }
}

/// A customer account.
///
/// Balances are [`Amount`]s, so no committed state can hold a negative
/// balance. The transaction log is private and only grows through
/// [`Account::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Email address, immutable once created
    pub id: String,
    pub personal_info: PersonalInfo,
    pub credential: Credential,
    pub primary_balance: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsAccount>,
    #[serde(default)]
    pub credit_applications: Vec<LoanApplication>,
    #[serde(default)]
    transactions: TransactionLog,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create an account with a zero balance and an empty log
    pub fn new(id: impl Into<String>, personal_info: PersonalInfo, credential: Credential) -> Self {
        Self {
            id: id.into(),
            personal_info,
            credential,
            primary_balance: Amount::ZERO,
            card: None,
            savings: None,
            credit_applications: Vec::new(),
            transactions: TransactionLog::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Whether login is allowed
    pub fn is_active(&self) -> bool {
        self.credential.active
    }

    /// Savings balance, zero when no savings sub-account exists
    pub fn savings_balance(&self) -> Amount {
        self.savings.as_ref().map(|s| s.balance).unwrap_or_default()
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    /// Append a record to this account's log
    pub fn record(&mut self, record: TransactionRecord) {
        self.transactions.append(record);
    }

    /// Look up a loan application by reference number
    pub fn loan_mut(&mut self, reference: &str) -> Option<&mut LoanApplication> {
        self.credit_applications
            .iter_mut()
            .find(|l| l.reference == reference)
    }

    /// Sum of remaining principal over active loans
    pub fn active_loan_principal(&self) -> Decimal {
        self.credit_applications
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.outstanding()))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, balance: {}, active: {})",
            self.id,
            self.personal_info.full_name(),
            self.primary_balance,
            self.credential.active
        )
    }
}
