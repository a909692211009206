//! SavingsModule - secondary balance with a fixed annual rate
//!
//! Funds only move between primary and savings through explicit calls.
//! Each move is one record on the account's log, signed from the primary
//! balance's point of view.

use crate::config::BankPolicy;
use crate::error::{BankError, BankResult};
use crate::ledger::operation_amount;
use crate::store::AccountStore;
use chrono::Utc;
use minibank_core::{round_money, SavingsAccount, TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Interest projection for a savings balance, rounded to money precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YieldProjection {
    pub balance: Decimal,
    /// Annual rate in percent
    pub rate: Decimal,
    pub monthly: Decimal,
    pub yearly: Decimal,
    pub balance_after_year: Decimal,
}

/// Project simple interest on a savings sub-account. Pure.
pub fn project_yield(savings: &SavingsAccount) -> YieldProjection {
    let balance = savings.balance.value();
    let yearly = balance * savings.rate / Decimal::ONE_HUNDRED;
    let monthly = yearly / Decimal::from(12);

    YieldProjection {
        balance,
        rate: savings.rate,
        monthly: round_money(monthly),
        yearly: round_money(yearly),
        balance_after_year: round_money(balance + yearly),
    }
}

pub struct SavingsModule<'a> {
    store: &'a mut AccountStore,
    policy: &'a BankPolicy,
}

impl<'a> SavingsModule<'a> {
    pub fn new(store: &'a mut AccountStore, policy: &'a BankPolicy) -> Self {
        Self { store, policy }
    }

    /// Open the savings sub-account. Returns false if it was already open.
    pub fn open(&mut self, account_id: &str) -> BankResult<bool> {
        let account = self.store.require_mut(account_id)?;
        if account.savings.is_some() {
            return Ok(false);
        }

        account.savings = Some(SavingsAccount::new(
            self.policy.savings_rate,
            Utc::now().date_naive(),
        ));
        info!(account = %account_id, rate = %self.policy.savings_rate, "savings opened");
        Ok(true)
    }

    /// Primary -> savings
    pub fn move_to_savings(
        &mut self,
        account_id: &str,
        amount: Decimal,
    ) -> BankResult<TransactionRecord> {
        let amount = operation_amount(amount)?;
        let account = self.store.require_mut(account_id)?;
        let savings = account
            .savings
            .as_ref()
            .ok_or_else(|| BankError::SavingsNotOpen(account_id.to_string()))?;

        let primary = account.primary_balance.checked_sub(&amount).ok_or_else(|| {
            BankError::insufficient_funds(amount.value(), account.primary_balance.value())
        })?;
        let saved = savings
            .balance
            .checked_add(&amount)
            .ok_or_else(|| BankError::InvalidAmount("balance overflow".to_string()))?;
        let record = TransactionRecord::new(
            TransactionKind::SavingsDeposit,
            amount,
            "Transfer to savings",
        );

        account.primary_balance = primary;
        if let Some(savings) = account.savings.as_mut() {
            savings.balance = saved;
        }
        account.record(record.clone());

        info!(account = %account_id, %amount, savings = %saved, "moved to savings");
        Ok(record)
    }

    /// Savings -> primary
    pub fn move_from_savings(
        &mut self,
        account_id: &str,
        amount: Decimal,
    ) -> BankResult<TransactionRecord> {
        let amount = operation_amount(amount)?;
        let account = self.store.require_mut(account_id)?;
        let savings = account
            .savings
            .as_ref()
            .ok_or_else(|| BankError::SavingsNotOpen(account_id.to_string()))?;

        let saved = savings.balance.checked_sub(&amount).ok_or_else(|| {
            BankError::insufficient_funds(amount.value(), savings.balance.value())
        })?;
        let primary = account
            .primary_balance
            .checked_add(&amount)
            .ok_or_else(|| BankError::InvalidAmount("balance overflow".to_string()))?;
        let record = TransactionRecord::new(
            TransactionKind::SavingsWithdrawal,
            amount,
            "Transfer from savings",
        );

        account.primary_balance = primary;
        if let Some(savings) = account.savings.as_mut() {
            savings.balance = saved;
        }
        account.record(record.clone());

        info!(account = %account_id, %amount, savings = %saved, "moved from savings");
        Ok(record)
    }

    /// Yield projection for the account's savings
    pub fn projected_yield(&self, account_id: &str) -> BankResult<YieldProjection> {
        let account = self.store.require(account_id)?;
        account
            .savings
            .as_ref()
            .map(project_yield)
            .ok_or_else(|| BankError::SavingsNotOpen(account_id.to_string()))
    }
}
