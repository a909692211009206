//! # Minibank Business
//!
//! The account ledger and financial-operation engine.
//!
//! - [`LedgerEngine`]: deposit, withdraw, transfer
//! - [`SavingsModule`]: savings sub-account and yield projection
//! - [`CreditModule`] / [`amortize`]: loan applications and repayment plans
//! - [`CredentialGuard`]: password hashing and lockout
//! - [`Bank`]: facade that owns the store and saves after every mutation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_business::{Bank, BankPolicy};
//! use minibank_persistence::JsonFileGateway;
//!
//! let mut bank = Bank::open(JsonFileGateway::new("data/accounts.json"), BankPolicy::default())?;
//! let session = bank.login("anna@example.com", "Secret1!")?;
//! bank.deposit(&session, dec!(500))?;
//! ```

pub mod bank;
pub mod config;
pub mod credential;
pub mod credit;
pub mod error;
pub mod ledger;
pub mod registration;
pub mod savings;
pub mod session;
pub mod store;

pub use bank::Bank;
pub use config::{BankPolicy, PolicyError};
pub use credential::CredentialGuard;
pub use credit::{amortize, AmortizationPlan, AmortizationRow, CreditModule, Schedule};
pub use error::{BankError, BankResult, PasswordRule, RegistrationIssue};
pub use ledger::LedgerEngine;
pub use registration::{RegistrationForm, Registrar};
pub use savings::{project_yield, SavingsModule, YieldProjection};
pub use session::Session;
pub use store::AccountStore;
