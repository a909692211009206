//! Savings commands

use anyhow::Result;
use minibank_business::Bank;
use minibank_core::format_money;

use crate::context;
use crate::SavingsAction;

pub fn handle(bank: &mut Bank, action: SavingsAction) -> Result<()> {
    match action {
        SavingsAction::Open { auth } => {
            let session = context::session(bank, &auth)?;
            if bank.open_savings(&session)? {
                println!(
                    "✅ Savings account opened at {}% p.a.",
                    bank.policy().savings_rate
                );
            } else {
                println!("ℹ️  Savings account is already open");
            }
        }

        SavingsAction::Deposit { auth, amount } => {
            let session = context::session(bank, &auth)?;
            bank.move_to_savings(&session, amount)?;
            let account = bank.account(&session)?;
            println!("✅ Moved {} ₽ to savings", format_money(amount));
            println!("   Primary: {} ₽", format_money(account.primary_balance.value()));
            println!("   Savings: {} ₽", format_money(account.savings_balance().value()));
        }

        SavingsAction::Withdraw { auth, amount } => {
            let session = context::session(bank, &auth)?;
            bank.move_from_savings(&session, amount)?;
            let account = bank.account(&session)?;
            println!("✅ Moved {} ₽ from savings", format_money(amount));
            println!("   Primary: {} ₽", format_money(account.primary_balance.value()));
            println!("   Savings: {} ₽", format_money(account.savings_balance().value()));
        }

        SavingsAction::Yield { auth } => {
            let session = context::session(bank, &auth)?;
            let projection = bank.projected_yield(&session)?;
            println!("📈 Savings projection ({}% p.a.)", projection.rate);
            println!("   Balance:          {} ₽", format_money(projection.balance));
            println!("   Monthly interest: {} ₽", format_money(projection.monthly));
            println!("   Yearly interest:  {} ₽", format_money(projection.yearly));
            println!(
                "   After one year:   {} ₽",
                format_money(projection.balance_after_year)
            );
        }
    }

    Ok(())
}
