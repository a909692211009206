//! Bank wiring for one CLI invocation

use anyhow::{Context, Result};
use minibank_business::{Bank, BankPolicy, Session};
use minibank_persistence::JsonFileGateway;
use std::path::Path;
use tracing::debug;

use crate::Auth;

/// Load the policy and the account store
pub fn open_bank(data: &Path, config: Option<&Path>) -> Result<Bank> {
    let policy = match config {
        Some(path) => BankPolicy::from_file(path)
            .with_context(|| format!("Failed to load policy from {:?}", path))?,
        None => BankPolicy::default(),
    };
    debug!(data = %data.display(), "opening account store");

    Bank::open(JsonFileGateway::new(data), policy)
        .with_context(|| format!("Failed to open account store {:?}", data))
}

/// Log in with the command's credentials
pub fn session(bank: &mut Bank, auth: &Auth) -> Result<Session> {
    bank.login(&auth.user, &auth.password)
        .with_context(|| format!("Login failed for {}", auth.user))
}
