//! # Loan Module
//!
//! LoanApplication and its status lifecycle. Approval itself is an external
//! decision; this module only checks that a recorded decision is a legal
//! move from the current status.

use crate::amount::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Filed, awaiting review
    Pending,
    Approved,
    Rejected,
    /// Disbursed; principal is being repaid
    Active,
    Closed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(LoanStatus::Pending),
            "approved" => Some(LoanStatus::Approved),
            "rejected" => Some(LoanStatus::Rejected),
            "active" => Some(LoanStatus::Active),
            "closed" => Some(LoanStatus::Closed),
            _ => None,
        }
    }

    /// Whether `self -> next` is a recordable move
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Active)
                | (LoanStatus::Active, LoanStatus::Closed)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("Loan {reference} cannot move from {from} to {to}")]
    InvalidTransition {
        reference: String,
        from: LoanStatus,
        to: LoanStatus,
    },
}

/// A credit application filed against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// 10-digit reference number
    pub reference: String,
    pub amount: Amount,
    pub date_filed: NaiveDate,
    pub status: LoanStatus,
    /// Only tracked once the loan is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_principal: Option<Amount>,
}

impl LoanApplication {
    /// New application in `pending` status
    pub fn new(reference: impl Into<String>, amount: Amount, date_filed: NaiveDate) -> Self {
        Self {
            reference: reference.into(),
            amount,
            date_filed,
            status: LoanStatus::Pending,
            remaining_principal: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Principal still owed; zero unless the loan is active
    pub fn outstanding(&self) -> Decimal {
        if self.is_active() {
            self.remaining_principal.map(|a| a.value()).unwrap_or_default()
        } else {
            Decimal::ZERO
        }
    }

    /// Record an external status decision
    pub fn transition(&mut self, next: LoanStatus) -> Result<(), LoanError> {
        if !self.status.can_transition_to(next) {
            return Err(LoanError::InvalidTransition {
                reference: self.reference.clone(),
                from: self.status,
                to: next,
            });
        }

        match next {
            LoanStatus::Active => self.remaining_principal = Some(self.amount),
            LoanStatus::Closed => self.remaining_principal = Some(Amount::ZERO),
            _ => {}
        }
        self.status = next;
        Ok(())
    }
}

impl fmt::Display for LoanApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loan #{} {} filed {} ({})",
            self.reference, self.amount, self.date_filed, self.status
        )
    }
}
