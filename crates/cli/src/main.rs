//! Minibank CLI - banking operations from the command line
//!
//! Usage:
//! ```bash
//! minibank register --email anna@example.com --first-name Anna --last-name Petrova \
//!     --phone +79161234567 --password 'Secret1!' --confirm-password 'Secret1!'
//! minibank deposit -u anna@example.com -p 'Secret1!' 500
//! minibank transfer -u anna@example.com -p 'Secret1!' oleg@example.com 250 --note rent
//! minibank savings open -u anna@example.com -p 'Secret1!'
//! minibank credit calc 100000 12 12 --schedule annuity
//! minibank history -u anna@example.com -p 'Secret1!' --kind deposit --sort amount-desc
//! minibank export -u anna@example.com -p 'Secret1!' --format csv
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;
mod context;

use commands::{account, credit, export, ledger, savings};
use minibank_business::Schedule;
use minibank_core::{HistorySort, LoanStatus, TransactionCategory, TransactionKind};

/// Minibank - single-institution retail bank engine
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Account store document
    #[arg(long, default_value = "data/accounts.json", global = true)]
    pub data: PathBuf,

    /// Policy file (JSON); defaults apply when absent
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials of the account a command acts on
#[derive(Args, Clone)]
pub struct Auth {
    /// Account email
    #[arg(long, short)]
    pub user: String,
    /// Account password
    #[arg(long, short)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Check credentials and show the account overview
    Login {
        #[command(flatten)]
        auth: Auth,
    },

    /// Show primary and savings balances
    Balance {
        #[command(flatten)]
        auth: Auth,
    },

    /// Deposit funds to the primary balance
    Deposit {
        #[command(flatten)]
        auth: Auth,
        /// Amount to deposit
        amount: Decimal,
    },

    /// Withdraw funds from the primary balance
    Withdraw {
        #[command(flatten)]
        auth: Auth,
        /// Amount to withdraw
        amount: Decimal,
    },

    /// Transfer funds to another account
    Transfer {
        #[command(flatten)]
        auth: Auth,
        /// Recipient email
        recipient: String,
        /// Amount to transfer
        amount: Decimal,
        /// Comment attached to both records
        #[arg(long)]
        note: Option<String>,
    },

    /// Savings sub-account
    Savings {
        #[command(subcommand)]
        action: SavingsAction,
    },

    /// Credit calculator and applications
    Credit {
        #[command(subcommand)]
        action: CreditAction,
    },

    /// Show transaction history
    History {
        #[command(flatten)]
        auth: Auth,
        /// Only records of this kind
        #[arg(long)]
        kind: Option<KindArg>,
        /// Only records of this group (both transfer directions, both savings moves)
        #[arg(long)]
        category: Option<CategoryArg>,
        #[arg(long, default_value = "date-newest")]
        sort: SortArg,
        /// Show at most this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export transaction history to a file
    Export {
        #[command(flatten)]
        auth: Auth,
        #[arg(long, default_value = "text")]
        format: ExportFormat,
        /// Output file path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace a password with a temporary one
    ResetPassword {
        /// Account email
        email: String,
    },
}

#[derive(Subcommand)]
pub enum SavingsAction {
    /// Open the savings sub-account
    Open {
        #[command(flatten)]
        auth: Auth,
    },
    /// Move funds from primary to savings
    Deposit {
        #[command(flatten)]
        auth: Auth,
        amount: Decimal,
    },
    /// Move funds from savings to primary
    Withdraw {
        #[command(flatten)]
        auth: Auth,
        amount: Decimal,
    },
    /// Show projected interest
    Yield {
        #[command(flatten)]
        auth: Auth,
    },
}

#[derive(Subcommand)]
pub enum CreditAction {
    /// Compute a repayment plan
    Calc {
        /// Loan amount
        principal: Decimal,
        /// Term in months
        term: u32,
        /// Annual rate in percent
        rate: Decimal,
        #[arg(long, default_value = "annuity")]
        schedule: ScheduleArg,
        /// Print the month-by-month table
        #[arg(long)]
        table: bool,
    },
    /// File a credit application
    Apply {
        #[command(flatten)]
        auth: Auth,
        amount: Decimal,
    },
    /// List credit applications
    List {
        #[command(flatten)]
        auth: Auth,
    },
    /// Record the credit reviewer's decision on an application (no borrower login)
    Decide {
        /// Borrower's account email
        account: String,
        /// 10-digit reference number
        reference: String,
        status: DecisionArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
    SavingsDeposit,
    SavingsWithdrawal,
}

impl KindArg {
    pub fn to_core_type(&self) -> TransactionKind {
        match self {
            KindArg::Deposit => TransactionKind::Deposit,
            KindArg::Withdrawal => TransactionKind::Withdrawal,
            KindArg::TransferOut => TransactionKind::TransferOut,
            KindArg::TransferIn => TransactionKind::TransferIn,
            KindArg::SavingsDeposit => TransactionKind::SavingsDeposit,
            KindArg::SavingsWithdrawal => TransactionKind::SavingsWithdrawal,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Deposit,
    Withdrawal,
    Transfer,
    Savings,
}

impl CategoryArg {
    pub fn to_core_type(&self) -> TransactionCategory {
        match self {
            CategoryArg::Deposit => TransactionCategory::Deposit,
            CategoryArg::Withdrawal => TransactionCategory::Withdrawal,
            CategoryArg::Transfer => TransactionCategory::Transfer,
            CategoryArg::Savings => TransactionCategory::Savings,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    DateNewest,
    DateOldest,
    AmountAsc,
    AmountDesc,
}

impl SortArg {
    pub fn to_core_type(&self) -> HistorySort {
        match self {
            SortArg::DateNewest => HistorySort::DateNewest,
            SortArg::DateOldest => HistorySort::DateOldest,
            SortArg::AmountAsc => HistorySort::AmountAscending,
            SortArg::AmountDesc => HistorySort::AmountDescending,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScheduleArg {
    Annuity,
    Differentiated,
}

impl ScheduleArg {
    pub fn to_core_type(&self) -> Schedule {
        match self {
            ScheduleArg::Annuity => Schedule::Annuity,
            ScheduleArg::Differentiated => Schedule::Differentiated,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    Approved,
    Rejected,
    Active,
    Closed,
}

impl DecisionArg {
    pub fn to_core_type(&self) -> LoanStatus {
        match self {
            DecisionArg::Approved => LoanStatus::Approved,
            DecisionArg::Rejected => LoanStatus::Rejected,
            DecisionArg::Active => LoanStatus::Active,
            DecisionArg::Closed => LoanStatus::Closed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Text,
    Csv,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut bank = context::open_bank(&cli.data, cli.config.as_deref())?;

    match cli.command {
        Commands::Register {
            email,
            first_name,
            last_name,
            phone,
            birth_date,
            address,
            password,
            confirm_password,
        } => {
            let form = minibank_business::RegistrationForm {
                email,
                first_name,
                last_name,
                phone,
                birth_date,
                address,
                password,
                confirm_password,
            };
            account::register(&mut bank, &form)?;
        }

        Commands::Login { auth } => account::login(&mut bank, &auth)?,
        Commands::Balance { auth } => account::balance(&mut bank, &auth)?,
        Commands::ResetPassword { email } => account::reset_password(&mut bank, &email)?,

        Commands::Deposit { auth, amount } => ledger::deposit(&mut bank, &auth, amount)?,
        Commands::Withdraw { auth, amount } => ledger::withdraw(&mut bank, &auth, amount)?,
        Commands::Transfer {
            auth,
            recipient,
            amount,
            note,
        } => ledger::transfer(&mut bank, &auth, &recipient, amount, note.as_deref())?,

        Commands::History {
            auth,
            kind,
            category,
            sort,
            limit,
        } => ledger::history(&mut bank, &auth, kind, category, sort, limit)?,

        Commands::Savings { action } => savings::handle(&mut bank, action)?,
        Commands::Credit { action } => credit::handle(&mut bank, action)?,

        Commands::Export {
            auth,
            format,
            output,
        } => export::run(&mut bank, &auth, format, output)?,
    }

    Ok(())
}
