//! CreditModule - amortization calculator and loan applications
//!
//! [`amortize`] is pure arithmetic on `Decimal`: the same inputs always
//! produce the same plan. Installments are computed at full precision and
//! rounded to money precision when reported; totals are sums of the
//! rounded installments.

use crate::config::BankPolicy;
use crate::error::{BankError, BankResult};
use crate::ledger::operation_amount;
use crate::store::AccountStore;
use chrono::Utc;
use minibank_core::{round_money, LoanApplication, LoanStatus};
use rand::Rng;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Repayment policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Constant total payment
    Annuity,
    /// Constant principal part, declining interest
    Differentiated,
}

impl Schedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Schedule::Annuity => "annuity",
            Schedule::Differentiated => "differentiated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "annuity" => Some(Schedule::Annuity),
            "differentiated" => Some(Schedule::Differentiated),
            _ => None,
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One month of a plan, rounded to money precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmortizationRow {
    /// 1-based
    pub month: u32,
    pub payment: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    /// Principal still owed after this payment
    pub remaining: Decimal,
}

/// Month-by-month repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmortizationPlan {
    pub schedule: Schedule,
    pub principal: Decimal,
    pub term_months: u32,
    pub annual_rate: Decimal,
    pub rows: Vec<AmortizationRow>,
    pub total_paid: Decimal,
    pub overpayment: Decimal,
}

impl AmortizationPlan {
    /// First installment; the constant one for annuity plans
    pub fn monthly_payment(&self) -> Decimal {
        self.rows.first().map(|r| r.payment).unwrap_or_default()
    }

    pub fn first_payment(&self) -> Decimal {
        self.monthly_payment()
    }

    pub fn last_payment(&self) -> Decimal {
        self.rows.last().map(|r| r.payment).unwrap_or_default()
    }
}

fn invalid(msg: &str) -> BankError {
    BankError::InvalidInput(msg.to_string())
}

fn out_of_range() -> BankError {
    invalid("loan parameters out of range")
}

/// Build an amortization plan.
///
/// # Arguments
/// * `principal` - Loan amount, > 0
/// * `term_months` - Number of monthly installments, > 0
/// * `annual_rate` - Annual interest rate in percent, > 0
pub fn amortize(
    principal: Decimal,
    term_months: u32,
    annual_rate: Decimal,
    schedule: Schedule,
) -> BankResult<AmortizationPlan> {
    if principal <= Decimal::ZERO {
        return Err(invalid("principal must be positive"));
    }
    if term_months == 0 {
        return Err(invalid("term must be at least one month"));
    }
    if annual_rate <= Decimal::ZERO {
        return Err(invalid("rate must be positive"));
    }

    let rate = annual_rate / Decimal::from(12) / Decimal::ONE_HUNDRED;
    let rows = match schedule {
        Schedule::Annuity => annuity_rows(principal, term_months, rate)?,
        Schedule::Differentiated => differentiated_rows(principal, term_months, rate)?,
    };

    let total_paid = rows
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.payment))
        .ok_or_else(out_of_range)?;
    let overpayment = total_paid.checked_sub(principal).ok_or_else(out_of_range)?;
    Ok(AmortizationPlan {
        schedule,
        principal,
        term_months,
        annual_rate,
        rows,
        total_paid,
        overpayment,
    })
}

fn annuity_rows(principal: Decimal, term: u32, rate: Decimal) -> BankResult<Vec<AmortizationRow>> {
    let growth = (Decimal::ONE + rate)
        .checked_powu(u64::from(term))
        .ok_or_else(|| invalid("term too long for this rate"))?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(invalid("rate too small"));
    }
    let payment = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(out_of_range)?;
    let installment = round_money(payment);

    let mut remaining = principal;
    let mut rows = Vec::with_capacity(term as usize);
    for month in 1..=term {
        let interest = remaining.checked_mul(rate).ok_or_else(out_of_range)?;
        let principal_part = payment.checked_sub(interest).ok_or_else(out_of_range)?;
        remaining = remaining
            .checked_sub(principal_part)
            .ok_or_else(out_of_range)?;
        let reported = if month == term || remaining < Decimal::ZERO {
            Decimal::ZERO
        } else {
            round_money(remaining)
        };
        rows.push(AmortizationRow {
            month,
            payment: installment,
            principal: round_money(principal_part),
            interest: round_money(interest),
            remaining: reported,
        });
    }
    Ok(rows)
}

fn differentiated_rows(
    principal: Decimal,
    term: u32,
    rate: Decimal,
) -> BankResult<Vec<AmortizationRow>> {
    let principal_part = principal / Decimal::from(term);

    let mut remaining = principal;
    let mut rows = Vec::with_capacity(term as usize);
    for month in 1..=term {
        let interest = remaining.checked_mul(rate).ok_or_else(out_of_range)?;
        let payment = principal_part
            .checked_add(interest)
            .ok_or_else(out_of_range)?;
        remaining -= principal_part;
        let reported = if month == term || remaining < Decimal::ZERO {
            Decimal::ZERO
        } else {
            round_money(remaining)
        };
        rows.push(AmortizationRow {
            month,
            payment: round_money(payment),
            principal: round_money(principal_part),
            interest: round_money(interest),
            remaining: reported,
        });
    }
    Ok(rows)
}

/// Loan applications of one account
pub struct CreditModule<'a> {
    store: &'a mut AccountStore,
    policy: &'a BankPolicy,
}

impl<'a> CreditModule<'a> {
    pub fn new(store: &'a mut AccountStore, policy: &'a BankPolicy) -> Self {
        Self { store, policy }
    }

    /// File a credit application in `pending` status. Moves no funds.
    pub fn apply(&mut self, account_id: &str, amount: Decimal) -> BankResult<LoanApplication> {
        let amount = operation_amount(amount)?;
        let account = self.store.require_mut(account_id)?;

        // A ceiling beyond the Decimal range covers every representable request
        let maximum = self
            .policy
            .max_credit(account.primary_balance.value())
            .unwrap_or(Decimal::MAX);
        if amount.value() > maximum {
            return Err(BankError::CreditLimitExceeded {
                requested: amount.value(),
                maximum,
            });
        }

        let outstanding = account.active_loan_principal();
        let allowed = maximum
            .checked_mul(self.policy.active_loan_share)
            .unwrap_or(Decimal::MAX);
        if outstanding > allowed {
            return Err(BankError::ActiveLoanConflict {
                outstanding,
                allowed,
            });
        }

        let reference = loop {
            let candidate = generate_reference();
            if !account
                .credit_applications
                .iter()
                .any(|l| l.reference == candidate)
            {
                break candidate;
            }
        };

        let application = LoanApplication::new(reference, amount, Utc::now().date_naive());
        account.credit_applications.push(application.clone());

        info!(
            account = %account_id,
            reference = %application.reference,
            %amount,
            "credit application filed"
        );
        Ok(application)
    }

    /// Record an external decision on an application
    pub fn record_decision(
        &mut self,
        account_id: &str,
        reference: &str,
        status: LoanStatus,
    ) -> BankResult<LoanApplication> {
        let account = self.store.require_mut(account_id)?;
        let loan = account
            .loan_mut(reference)
            .ok_or_else(|| BankError::LoanNotFound(reference.to_string()))?;

        loan.transition(status)?;
        info!(account = %account_id, %reference, status = %status, "loan decision recorded");
        Ok(loan.clone())
    }

    pub fn applications(&self, account_id: &str) -> BankResult<&[LoanApplication]> {
        Ok(&self.store.require(account_id)?.credit_applications)
    }
}

/// 10-digit reference number
fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    (0..10)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
