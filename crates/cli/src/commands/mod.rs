//! CLI command handlers

pub mod account;
pub mod credit;
pub mod export;
pub mod ledger;
pub mod savings;
