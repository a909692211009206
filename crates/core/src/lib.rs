//! # Minibank Core
//!
//! Domain types shared by every Minibank crate.
//!
//! - [`Amount`]: non-negative money value
//! - [`money`]: the rounding rule and display helpers
//! - [`Account`]: customer record with balances, card, savings and loans
//! - [`TransactionLog`]: append-only per-account ledger
//! - [`LoanApplication`]: credit application and its status lifecycle

pub mod account;
pub mod amount;
pub mod loan;
pub mod money;
pub mod transaction;

pub use account::{Account, Card, Credential, PersonalInfo, SavingsAccount};
pub use amount::{Amount, AmountError};
pub use loan::{LoanApplication, LoanError, LoanStatus};
pub use money::{format_money, format_signed, round_money, CURRENCY_CODE, CURRENCY_SYMBOL};
pub use transaction::{
    HistoryQuery, HistorySort, TransactionCategory, TransactionKind, TransactionLog,
    TransactionRecord,
};
