//! # Transaction Module
//!
//! TransactionRecord, TransactionKind and TransactionLog.
//! The log is append-only: records are never edited, reordered or removed.
//! Display ordering is produced on demand by [`TransactionLog::query`].

use crate::amount::Amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Cash in to the primary balance
    Deposit,
    /// Cash out of the primary balance
    Withdrawal,
    /// Sender side of a transfer
    TransferOut,
    /// Recipient side of a transfer
    TransferIn,
    /// Primary -> savings
    SavingsDeposit,
    /// Savings -> primary
    SavingsWithdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
            TransactionKind::SavingsDeposit => "savings_deposit",
            TransactionKind::SavingsWithdrawal => "savings_withdrawal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            "transfer_out" => Some(TransactionKind::TransferOut),
            "transfer_in" => Some(TransactionKind::TransferIn),
            "savings_deposit" => Some(TransactionKind::SavingsDeposit),
            "savings_withdrawal" => Some(TransactionKind::SavingsWithdrawal),
            _ => None,
        }
    }

    /// True if this kind increases the primary balance.
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            TransactionKind::Deposit
                | TransactionKind::TransferIn
                | TransactionKind::SavingsWithdrawal
        )
    }

    /// Group used by history views
    pub fn category(&self) -> TransactionCategory {
        match self {
            TransactionKind::Deposit => TransactionCategory::Deposit,
            TransactionKind::Withdrawal => TransactionCategory::Withdrawal,
            TransactionKind::TransferOut | TransactionKind::TransferIn => {
                TransactionCategory::Transfer
            }
            TransactionKind::SavingsDeposit | TransactionKind::SavingsWithdrawal => {
                TransactionCategory::Savings
            }
        }
    }

    /// All transaction kinds
    pub fn all() -> [TransactionKind; 6] {
        [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::TransferOut,
            TransactionKind::TransferIn,
            TransactionKind::SavingsDeposit,
            TransactionKind::SavingsWithdrawal,
        ]
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarser grouping of kinds: both transfer directions, both savings moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    Deposit,
    Withdrawal,
    Transfer,
    Savings,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Deposit => "deposit",
            TransactionCategory::Withdrawal => "withdrawal",
            TransactionCategory::Transfer => "transfer",
            TransactionCategory::Savings => "savings",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(TransactionCategory::Deposit),
            "withdrawal" => Some(TransactionCategory::Withdrawal),
            "transfer" => Some(TransactionCategory::Transfer),
            "savings" => Some(TransactionCategory::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable entry of an account's ledger.
///
/// `amount` is signed from the primary balance's point of view: negative
/// values reduced it, positive values increased it. The sign is derived
/// from the kind at construction, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    /// The other account of a transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
}

impl TransactionRecord {
    /// Create a record stamped now
    pub fn new(kind: TransactionKind, amount: Amount, description: impl Into<String>) -> Self {
        Self::at(Utc::now(), kind, amount, description)
    }

    /// Create a record with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        kind: TransactionKind,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        let signed = if kind.is_credit() {
            amount.value()
        } else {
            -amount.value()
        };
        Self {
            timestamp,
            kind,
            amount: signed,
            description: description.into(),
            counterparty: None,
        }
    }

    pub fn with_counterparty(mut self, counterparty: &str) -> Self {
        self.counterparty = Some(counterparty.to_string());
        self
    }

    /// Build the two linked sides of a transfer with one shared timestamp.
    pub fn transfer_pair(
        sender_id: &str,
        recipient_id: &str,
        amount: Amount,
        note: Option<&str>,
    ) -> (Self, Self) {
        let timestamp = Utc::now();
        let suffix = note
            .filter(|n| !n.trim().is_empty())
            .map(|n| format!(": {}", n.trim()))
            .unwrap_or_default();

        let outgoing = Self::at(
            timestamp,
            TransactionKind::TransferOut,
            amount,
            format!("Transfer to {}{}", recipient_id, suffix),
        )
        .with_counterparty(recipient_id);

        let incoming = Self::at(
            timestamp,
            TransactionKind::TransferIn,
            amount,
            format!("Transfer from {}{}", sender_id, suffix),
        )
        .with_counterparty(sender_id);

        (outgoing, incoming)
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.amount,
            self.description
        )
    }
}

/// Display ordering for a history view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    #[default]
    DateNewest,
    DateOldest,
    AmountAscending,
    AmountDescending,
}

/// Filter + sort applied to a log for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub kind: Option<TransactionKind>,
    pub category: Option<TransactionCategory>,
    pub sort: HistorySort,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn in_category(mut self, category: TransactionCategory) -> Self {
        self.category = Some(category);
        self
    }

    fn matches(&self, record: &TransactionRecord) -> bool {
        self.kind.map_or(true, |k| record.kind == k)
            && self.category.map_or(true, |c| record.kind.category() == c)
    }

    pub fn sorted_by(mut self, sort: HistorySort) -> Self {
        self.sort = sort;
        self
    }
}

/// Append-only, insertion-ordered ledger of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end of the log
    pub fn append(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }

    /// Most recent `n` records, newest first
    pub fn recent(&self, n: usize) -> Vec<&TransactionRecord> {
        self.records.iter().rev().take(n).collect()
    }

    /// Sum of all signed amounts
    pub fn net_total(&self) -> Decimal {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// Filtered and sorted view. Sorting is stable; the log itself is untouched.
    pub fn query(&self, query: &HistoryQuery) -> Vec<&TransactionRecord> {
        let mut view: Vec<&TransactionRecord> = self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .collect();

        match query.sort {
            HistorySort::DateNewest => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            HistorySort::DateOldest => view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            HistorySort::AmountAscending => view.sort_by(|a, b| a.amount.cmp(&b.amount)),
            HistorySort::AmountDescending => view.sort_by(|a, b| b.amount.cmp(&a.amount)),
        }

        view
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
