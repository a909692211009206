//! LedgerEngine - deposit, withdraw, transfer
//!
//! Each operation validates everything first and only then mutates, so a
//! failing call leaves the store untouched. A committed operation changes
//! the primary balance and appends the matching record in the same step.

use crate::config::BankPolicy;
use crate::error::{BankError, BankResult};
use crate::store::AccountStore;
use minibank_core::{Amount, TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use tracing::info;

/// Validate a caller-supplied operation amount
pub(crate) fn operation_amount(value: Decimal) -> BankResult<Amount> {
    Ok(Amount::positive(value)?)
}

fn overflow() -> BankError {
    BankError::InvalidAmount("balance overflow".to_string())
}

/// Applies balance-changing operations on the primary balance
pub struct LedgerEngine<'a> {
    store: &'a mut AccountStore,
    policy: &'a BankPolicy,
}

impl<'a> LedgerEngine<'a> {
    pub fn new(store: &'a mut AccountStore, policy: &'a BankPolicy) -> Self {
        Self { store, policy }
    }

    /// Credit the primary balance
    pub fn deposit(&mut self, account_id: &str, amount: Decimal) -> BankResult<TransactionRecord> {
        let amount = operation_amount(amount)?;
        let account = self.store.require_mut(account_id)?;

        let balance = account
            .primary_balance
            .checked_add(&amount)
            .ok_or_else(overflow)?;
        let record = TransactionRecord::new(TransactionKind::Deposit, amount, "Deposit");

        account.primary_balance = balance;
        account.record(record.clone());

        info!(account = %account_id, %amount, balance = %balance, "deposit committed");
        Ok(record)
    }

    /// Debit the primary balance
    pub fn withdraw(&mut self, account_id: &str, amount: Decimal) -> BankResult<TransactionRecord> {
        let amount = operation_amount(amount)?;
        let account = self.store.require_mut(account_id)?;

        let balance = account.primary_balance.checked_sub(&amount).ok_or_else(|| {
            BankError::insufficient_funds(amount.value(), account.primary_balance.value())
        })?;
        let record = TransactionRecord::new(TransactionKind::Withdrawal, amount, "Withdrawal");

        account.primary_balance = balance;
        account.record(record.clone());

        info!(account = %account_id, %amount, balance = %balance, "withdrawal committed");
        Ok(record)
    }

    /// Move funds between two primary balances.
    ///
    /// Returns the `(transfer_out, transfer_in)` records. Both balances are
    /// computed before either account is touched.
    pub fn transfer(
        &mut self,
        sender_id: &str,
        recipient_id: &str,
        amount: Decimal,
        note: Option<&str>,
    ) -> BankResult<(TransactionRecord, TransactionRecord)> {
        let amount = operation_amount(amount)?;
        if sender_id == recipient_id {
            return Err(BankError::SelfTransfer);
        }

        let sender = self.store.require(sender_id)?;
        let recipient = self
            .store
            .get(recipient_id)
            .ok_or_else(|| BankError::RecipientNotFound(recipient_id.to_string()))?;

        let sender_balance = sender.primary_balance.checked_sub(&amount).ok_or_else(|| {
            BankError::insufficient_funds(amount.value(), sender.primary_balance.value())
        })?;
        if amount.value() > self.policy.transfer_limit {
            return Err(BankError::limit_exceeded(
                amount.value(),
                self.policy.transfer_limit,
            ));
        }
        let recipient_balance = recipient
            .primary_balance
            .checked_add(&amount)
            .ok_or_else(overflow)?;

        let (outgoing, incoming) =
            TransactionRecord::transfer_pair(sender_id, recipient_id, amount, note);

        // Nothing below can fail
        let sender = self.store.require_mut(sender_id)?;
        sender.primary_balance = sender_balance;
        sender.record(outgoing.clone());

        let recipient = self.store.require_mut(recipient_id)?;
        recipient.primary_balance = recipient_balance;
        recipient.record(incoming.clone());

        info!(
            from = %sender_id,
            to = %recipient_id,
            %amount,
            "transfer committed"
        );
        Ok((outgoing, incoming))
    }
}
