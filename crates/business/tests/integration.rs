//! Integration tests for registration + ledger + savings + credit over a JSON store

use rust_decimal_macros::dec;
use tempfile::tempdir;

use minibank_business::{amortize, Bank, BankError, BankPolicy, RegistrationForm, Schedule};
use minibank_core::{
    HistoryQuery, HistorySort, LoanStatus, TransactionCategory, TransactionKind,
};
use minibank_persistence::JsonFileGateway;

fn form(email: &str, password: &str) -> RegistrationForm {
    RegistrationForm {
        email: email.to_string(),
        first_name: "Nikolai".to_string(),
        last_name: "Fedorov".to_string(),
        phone: "+7 903 111-22-33".to_string(),
        birth_date: Some("1979-11-03".to_string()),
        address: Some("Saint Petersburg".to_string()),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

#[test]
fn test_full_customer_flow_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data/accounts.json");

    {
        let mut bank = Bank::open(JsonFileGateway::new(&path), BankPolicy::default()).unwrap();
        bank.register(&form("nikolai@example.com", "Nik0lai!pw")).unwrap();
        bank.register(&form("vera@example.com", "Vera#2024x")).unwrap();

        let session = bank.login("nikolai@example.com", "Nik0lai!pw").unwrap();
        bank.deposit(&session, dec!(2500.50)).unwrap();
        bank.withdraw(&session, dec!(0.50)).unwrap();
        bank.transfer(&session, "vera@example.com", dec!(1000), Some("gift"))
            .unwrap();

        bank.open_savings(&session).unwrap();
        bank.move_to_savings(&session, dec!(1200)).unwrap();

        let loan = bank.apply_for_credit(&session, dec!(3000)).unwrap();
        bank.record_loan_decision("nikolai@example.com", &loan.reference, LoanStatus::Approved)
            .unwrap();
    }

    let mut bank = Bank::open(JsonFileGateway::new(&path), BankPolicy::default()).unwrap();
    let session = bank.login("nikolai@example.com", "Nik0lai!pw").unwrap();
    let account = bank.account(&session).unwrap();

    assert_eq!(account.primary_balance.value(), dec!(1300.00));
    assert_eq!(account.savings_balance().value(), dec!(1200));
    assert_eq!(account.transactions().len(), 5);
    assert_eq!(
        account.transactions().net_total(),
        account.primary_balance.value()
    );
    assert_eq!(account.credit_applications[0].status, LoanStatus::Approved);

    let vera = bank.store().get("vera@example.com").unwrap();
    assert_eq!(vera.primary_balance.value(), dec!(2000));
    let incoming = vera.transactions().last().unwrap();
    assert_eq!(incoming.kind, TransactionKind::TransferIn);
    assert_eq!(incoming.description, "Transfer from nikolai@example.com: gift");

    let transfers = bank
        .history(
            &session,
            &HistoryQuery::new()
                .with_kind(TransactionKind::TransferOut)
                .sorted_by(HistorySort::DateOldest),
        )
        .unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].amount, dec!(-1000));

    let savings = bank
        .history(
            &session,
            &HistoryQuery::new().in_category(TransactionCategory::Savings),
        )
        .unwrap();
    assert_eq!(savings.len(), 1);
    assert_eq!(savings[0].kind, TransactionKind::SavingsDeposit);
}

#[test]
fn test_lockout_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    {
        let mut bank = Bank::open(JsonFileGateway::new(&path), BankPolicy::default()).unwrap();
        bank.register(&form("nikolai@example.com", "Nik0lai!pw")).unwrap();
        for _ in 0..5 {
            assert!(bank.login("nikolai@example.com", "guess").is_err());
        }
    }

    let mut bank = Bank::open(JsonFileGateway::new(&path), BankPolicy::default()).unwrap();
    let err = bank.login("nikolai@example.com", "Nik0lai!pw").unwrap_err();
    assert!(matches!(err, BankError::AccountLocked(_)));
}

#[test]
fn test_rejected_operations_change_nothing_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let mut bank = Bank::open(JsonFileGateway::new(&path), BankPolicy::default()).unwrap();
    bank.register(&form("nikolai@example.com", "Nik0lai!pw")).unwrap();
    let session = bank.login("nikolai@example.com", "Nik0lai!pw").unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(matches!(
        bank.withdraw(&session, dec!(1000.01)),
        Err(BankError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        bank.transfer(&session, "nikolai@example.com", dec!(10), None),
        Err(BankError::SelfTransfer)
    ));
    assert!(matches!(
        bank.transfer(&session, "ghost@example.com", dec!(10), None),
        Err(BankError::RecipientNotFound(_))
    ));
    assert!(matches!(
        bank.move_to_savings(&session, dec!(10)),
        Err(BankError::SavingsNotOpen(_))
    ));
    assert!(matches!(
        bank.apply_for_credit(&session, dec!(10000.01)),
        Err(BankError::CreditLimitExceeded { .. })
    ));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_custom_policy_limits() {
    let dir = tempdir().unwrap();
    let policy = BankPolicy::default()
        .with_transfer_limit(dec!(100))
        .with_opening_balance(dec!(500));

    let mut bank = Bank::open(JsonFileGateway::new(dir.path().join("a.json")), policy).unwrap();
    bank.register(&form("a@example.com", "Aa1!aaaa")).unwrap();
    bank.register(&form("b@example.com", "Bb1!bbbb")).unwrap();
    let session = bank.login("a@example.com", "Aa1!aaaa").unwrap();

    assert!(matches!(
        bank.transfer(&session, "b@example.com", dec!(100.01), None),
        Err(BankError::LimitExceeded { .. })
    ));
    bank.transfer(&session, "b@example.com", dec!(100), None).unwrap();
    assert_eq!(bank.balance(&session).unwrap().value(), dec!(400));
}

#[test]
fn test_calculator_matches_reference_plan() {
    let annuity = amortize(dec!(100000), 12, dec!(12), Schedule::Annuity).unwrap();
    assert_eq!(annuity.monthly_payment(), dec!(8884.88));
    assert_eq!(annuity.total_paid, dec!(106618.56));
    assert_eq!(annuity.overpayment, dec!(6618.56));

    let differentiated = amortize(dec!(100000), 12, dec!(12), Schedule::Differentiated).unwrap();
    assert!(differentiated.first_payment() > differentiated.last_payment());
    assert!(differentiated.overpayment < annuity.overpayment);
}
