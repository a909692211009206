//! Account commands: register, login, balance, reset-password

use anyhow::{Context, Result};
use minibank_business::{Bank, RegistrationForm};
use minibank_core::format_money;

use crate::context;
use crate::Auth;

pub fn register(bank: &mut Bank, form: &RegistrationForm) -> Result<()> {
    let account = bank.register(form).context("Registration failed")?;

    println!("✅ Account created!");
    println!("   Email:   {}", account.id);
    println!("   Name:    {}", account.personal_info.full_name());
    if let Some(card) = &account.card {
        println!("   Card:    {} (valid until {})", card.masked(), card.expires_on);
    }
    println!("   Balance: {} ₽", format_money(account.primary_balance.value()));
    Ok(())
}

pub fn login(bank: &mut Bank, auth: &Auth) -> Result<()> {
    let session = context::session(bank, auth)?;
    let account = bank.account(&session)?;

    println!("✅ Welcome, {}!", account.personal_info.full_name());
    println!("   Session: {}", session.id());
    println!("   Balance: {} ₽", format_money(account.primary_balance.value()));
    if let Some(card) = &account.card {
        println!("   Card:    {}", card.masked());
    }

    let recent = account.transactions().recent(5);
    if !recent.is_empty() {
        println!();
        println!("   Recent transactions:");
        for record in recent {
            println!("   {}", record);
        }
    }
    Ok(())
}

pub fn balance(bank: &mut Bank, auth: &Auth) -> Result<()> {
    let session = context::session(bank, auth)?;
    let account = bank.account(&session)?;

    println!("💰 Balances for {}", account.id);
    println!("   Primary: {} ₽", format_money(account.primary_balance.value()));
    match &account.savings {
        Some(savings) => println!(
            "   Savings: {} ₽ ({}% p.a., opened {})",
            format_money(savings.balance.value()),
            savings.rate,
            savings.opened_on
        ),
        None => println!("   Savings: not open"),
    }
    Ok(())
}

pub fn reset_password(bank: &mut Bank, email: &str) -> Result<()> {
    let temporary = bank
        .reset_password(email)
        .with_context(|| format!("Password reset failed for {}", email))?;

    println!("🔑 Temporary password for {}: {}", email, temporary);
    println!("   It is shown only once.");
    Ok(())
}
