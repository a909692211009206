//! Ledger commands: deposit, withdraw, transfer, history

use anyhow::Result;
use minibank_business::Bank;
use minibank_core::{format_money, format_signed, HistoryQuery};
use rust_decimal::Decimal;

use crate::context;
use crate::{Auth, CategoryArg, KindArg, SortArg};

pub fn deposit(bank: &mut Bank, auth: &Auth, amount: Decimal) -> Result<()> {
    let session = context::session(bank, auth)?;
    let record = bank.deposit(&session, amount)?;

    println!("✅ Deposit successful!");
    println!("   Amount:  {} ₽", format_money(record.amount));
    println!("   Balance: {} ₽", format_money(bank.balance(&session)?.value()));
    Ok(())
}

pub fn withdraw(bank: &mut Bank, auth: &Auth, amount: Decimal) -> Result<()> {
    let session = context::session(bank, auth)?;
    let record = bank.withdraw(&session, amount)?;

    println!("✅ Withdrawal successful!");
    println!("   Amount:  {} ₽", format_money(record.amount.abs()));
    println!("   Balance: {} ₽", format_money(bank.balance(&session)?.value()));
    Ok(())
}

pub fn transfer(
    bank: &mut Bank,
    auth: &Auth,
    recipient: &str,
    amount: Decimal,
    note: Option<&str>,
) -> Result<()> {
    let session = context::session(bank, auth)?;
    let record = bank.transfer(&session, recipient, amount, note)?;

    println!("✅ Transfer successful!");
    println!("   To:      {}", recipient);
    println!("   Amount:  {} ₽", format_money(record.amount.abs()));
    println!("   Note:    {}", record.description);
    println!("   Balance: {} ₽", format_money(bank.balance(&session)?.value()));
    Ok(())
}

pub fn history(
    bank: &mut Bank,
    auth: &Auth,
    kind: Option<KindArg>,
    category: Option<CategoryArg>,
    sort: SortArg,
    limit: Option<usize>,
) -> Result<()> {
    let session = context::session(bank, auth)?;

    let mut query = HistoryQuery::new().sorted_by(sort.to_core_type());
    if let Some(kind) = kind {
        query = query.with_kind(kind.to_core_type());
    }
    if let Some(category) = category {
        query = query.in_category(category.to_core_type());
    }
    let records = bank.history(&session, &query)?;

    if records.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<19}  {:<18}  {:>15}  {}",
        "Date", "Type", "Amount", "Description"
    );
    println!("{}", "-".repeat(80));
    for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<19}  {:<18}  {:>15}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.kind.as_str(),
            format_signed(record.amount),
            record.description
        );
    }
    Ok(())
}
