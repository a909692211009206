//! Credit commands: calculator, applications, decisions

use anyhow::Result;
use minibank_business::{amortize, AmortizationPlan, Bank};
use minibank_core::format_money;

use crate::context;
use crate::CreditAction;

pub fn handle(bank: &mut Bank, action: CreditAction) -> Result<()> {
    match action {
        CreditAction::Calc {
            principal,
            term,
            rate,
            schedule,
            table,
        } => {
            let plan = amortize(principal, term, rate, schedule.to_core_type())?;
            print_plan(&plan, table);
        }

        CreditAction::Apply { auth, amount } => {
            let session = context::session(bank, &auth)?;
            let loan = bank.apply_for_credit(&session, amount)?;
            println!("✅ Credit application filed");
            println!("   Reference: {}", loan.reference);
            println!("   Amount:    {} ₽", format_money(loan.amount.value()));
            println!("   Status:    {}", loan.status);
        }

        CreditAction::List { auth } => {
            let session = context::session(bank, &auth)?;
            let loans = bank.loans(&session)?;
            if loans.is_empty() {
                println!("No credit applications.");
            }
            for loan in loans {
                println!("   {}", loan);
            }
        }

        CreditAction::Decide {
            account,
            reference,
            status,
        } => {
            let loan = bank.record_loan_decision(&account, &reference, status.to_core_type())?;
            println!("✅ Loan {} is now {}", loan.reference, loan.status);
        }
    }

    Ok(())
}

fn print_plan(plan: &AmortizationPlan, table: bool) {
    println!(
        "🧮 {} loan of {} ₽ over {} months at {}%",
        plan.schedule,
        format_money(plan.principal),
        plan.term_months,
        plan.annual_rate
    );
    if plan.first_payment() == plan.last_payment() {
        println!("   Monthly payment: {} ₽", format_money(plan.monthly_payment()));
    } else {
        println!("   First payment:   {} ₽", format_money(plan.first_payment()));
        println!("   Last payment:    {} ₽", format_money(plan.last_payment()));
    }
    println!("   Total paid:      {} ₽", format_money(plan.total_paid));
    println!("   Overpayment:     {} ₽", format_money(plan.overpayment));

    if table {
        println!();
        println!(
            "{:>5}  {:>14}  {:>14}  {:>14}  {:>14}",
            "Month", "Payment", "Principal", "Interest", "Remaining"
        );
        for row in &plan.rows {
            println!(
                "{:>5}  {:>14}  {:>14}  {:>14}  {:>14}",
                row.month,
                format_money(row.payment),
                format_money(row.principal),
                format_money(row.interest),
                format_money(row.remaining)
            );
        }
    }
}
