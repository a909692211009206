//! Account registration
//!
//! Every check runs and all failures come back together as
//! [`BankError::InvalidRegistration`]. A successful registration issues a
//! debit card and books the opening balance as a regular deposit record.

use crate::config::BankPolicy;
use crate::credential::CredentialGuard;
use crate::error::{BankError, BankResult, PasswordRule, RegistrationIssue};
use crate::store::AccountStore;
use chrono::{Datelike, NaiveDate, Utc};
use minibank_core::{
    round_money, Account, Amount, Card, Credential, PersonalInfo, TransactionKind,
    TransactionRecord,
};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Raw registration input as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// `local@domain.tld` with a tld of at least two letters
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}

/// Optional `+`, then a non-zero digit and 10 to 14 more digits.
/// Spaces, dashes and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let mut chars = digits.chars();
    match chars.next() {
        Some(first) if ('1'..='9').contains(&first) => {}
        _ => return false,
    }
    let rest = chars.as_str();
    (10..=14).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit())
}

/// First password strength rule the password breaks, if any
pub fn password_violation(password: &str) -> Option<PasswordRule> {
    if password.chars().count() < 8 {
        Some(PasswordRule::MinLength)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(PasswordRule::Uppercase)
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some(PasswordRule::Lowercase)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(PasswordRule::Digit)
    } else if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        Some(PasswordRule::Special)
    } else {
        None
    }
}

/// Run every registration check
pub fn validate_form(
    form: &RegistrationForm,
    policy: &BankPolicy,
    email_taken: bool,
    today: NaiveDate,
) -> Vec<RegistrationIssue> {
    let mut issues = Vec::new();

    for (field, value) in [
        ("first name", &form.first_name),
        ("last name", &form.last_name),
        ("phone", &form.phone),
    ] {
        if value.trim().is_empty() {
            issues.push(RegistrationIssue::MissingField { field });
        }
    }

    if !is_valid_email(form.email.trim()) {
        issues.push(RegistrationIssue::InvalidEmail);
    } else if email_taken {
        issues.push(RegistrationIssue::EmailTaken);
    }

    if !form.phone.trim().is_empty() && !is_valid_phone(&form.phone) {
        issues.push(RegistrationIssue::InvalidPhone);
    }

    if let Some(rule) = password_violation(&form.password) {
        issues.push(RegistrationIssue::WeakPassword(rule));
    }
    if form.password != form.confirm_password {
        issues.push(RegistrationIssue::PasswordMismatch);
    }

    if let Some(raw) = form.birth_date.as_deref().filter(|s| !s.trim().is_empty()) {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(born) => match today.years_since(born) {
                Some(age) if age >= policy.minimum_age => {}
                Some(_) => issues.push(RegistrationIssue::Underage {
                    minimum_age: policy.minimum_age,
                }),
                None => issues.push(RegistrationIssue::InvalidBirthDate),
            },
            Err(_) => issues.push(RegistrationIssue::InvalidBirthDate),
        }
    }

    issues
}

fn random_digits(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// New debit card expiring on 31 December, `card_validity_years` from now
pub fn issue_card(policy: &BankPolicy, today: NaiveDate) -> Card {
    let mut rng = rand::thread_rng();
    let first = char::from(b'0' + rng.gen_range(1..10u8));
    let number = format!("{}{}", first, random_digits(&mut rng, 15));
    let expires_on = NaiveDate::from_ymd_opt(today.year() + policy.card_validity_years, 12, 31)
        .unwrap_or(NaiveDate::MAX);

    Card {
        number,
        cvv: random_digits(&mut rng, 3),
        expires_on,
    }
}

pub struct Registrar<'a> {
    store: &'a mut AccountStore,
    policy: &'a BankPolicy,
}

impl<'a> Registrar<'a> {
    pub fn new(store: &'a mut AccountStore, policy: &'a BankPolicy) -> Self {
        Self { store, policy }
    }

    /// Validate the form and create the account
    pub fn register(&mut self, form: &RegistrationForm) -> BankResult<Account> {
        let today = Utc::now().date_naive();
        let email = form.email.trim().to_string();

        let issues = validate_form(form, self.policy, self.store.contains(&email), today);
        if !issues.is_empty() {
            return Err(BankError::InvalidRegistration(issues));
        }

        let birth_date = form
            .birth_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
        let address = form
            .address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let info = PersonalInfo {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            birth_date,
            address,
        };
        let guard = CredentialGuard::new(self.policy);
        let credential = Credential::new(guard.hash(&form.password));

        let mut account =
            Account::new(email.clone(), info, credential).with_card(issue_card(self.policy, today));

        let opening = round_money(self.policy.opening_balance);
        if opening > Decimal::ZERO {
            let amount = Amount::positive(opening)?;
            account.primary_balance = amount;
            account.record(TransactionRecord::new(
                TransactionKind::Deposit,
                amount,
                "Opening balance",
            ));
        }

        self.store.insert(account.clone())?;
        info!(account = %email, opening = %opening, "account registered");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form() -> RegistrationForm {
        RegistrationForm {
            email: "maria@example.com".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Sokolova".to_string(),
            phone: "+7 (916) 123-45-67".to_string(),
            birth_date: Some("1995-06-15".to_string()),
            address: Some("Kazan".to_string()),
            password: "Str0ng!Pass".to_string(),
            confirm_password: "Str0ng!Pass".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a.b+c@mail.example.ru"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("user@host"));
        assert!(!is_valid_email("user@host.c"));
        assert!(!is_valid_email("@host.com"));
        assert!(!is_valid_email("us er@host.com"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+79161234567"));
        assert!(is_valid_phone("8 (916) 123-45-67"));
        assert!(!is_valid_phone("+09161234567"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("+7916123456789012"));
        assert!(!is_valid_phone("+7916abc4567"));
    }

    #[test]
    fn test_password_rules_in_order() {
        assert_eq!(password_violation("Sh0rt!"), Some(PasswordRule::MinLength));
        assert_eq!(password_violation("lower0!case"), Some(PasswordRule::Uppercase));
        assert_eq!(password_violation("UPPER0!CASE"), Some(PasswordRule::Lowercase));
        assert_eq!(password_violation("NoDigits!!"), Some(PasswordRule::Digit));
        assert_eq!(password_violation("NoSpecial00"), Some(PasswordRule::Special));
        assert_eq!(password_violation("Str0ng!Pass"), None);
    }

    #[test]
    fn test_valid_form_has_no_issues() {
        let issues = validate_form(&form(), &BankPolicy::default(), false, today());
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_all_issues_reported_together() {
        let mut form = form();
        form.email = "broken".to_string();
        form.phone = "12".to_string();
        form.confirm_password = "different".to_string();
        form.birth_date = Some("15.06.1995".to_string());

        let issues = validate_form(&form, &BankPolicy::default(), false, today());
        assert!(issues.contains(&RegistrationIssue::InvalidEmail));
        assert!(issues.contains(&RegistrationIssue::InvalidPhone));
        assert!(issues.contains(&RegistrationIssue::PasswordMismatch));
        assert!(issues.contains(&RegistrationIssue::InvalidBirthDate));
    }

    #[test]
    fn test_underage_rejected() {
        let mut form = form();
        form.birth_date = Some("2008-10-20".to_string());
        let issues = validate_form(&form, &BankPolicy::default(), false, today());
        assert_eq!(issues, vec![RegistrationIssue::Underage { minimum_age: 18 }]);

        form.birth_date = Some("2008-10-19".to_string());
        assert!(validate_form(&form, &BankPolicy::default(), false, today()).is_empty());
    }

    #[test]
    fn test_register_creates_account_with_opening_balance() {
        let mut store = AccountStore::new();
        let policy = BankPolicy::default();
        let account = Registrar::new(&mut store, &policy).register(&form()).unwrap();

        assert_eq!(account.id, "maria@example.com");
        assert_eq!(account.primary_balance.value(), dec!(1000));
        assert_eq!(account.transactions().len(), 1);
        assert_eq!(account.transactions().net_total(), dec!(1000));
        assert_eq!(
            account.transactions().last().unwrap().description,
            "Opening balance"
        );
        assert_eq!(account.personal_info.address.as_deref(), Some("Kazan"));
        assert!(account.is_active());

        let card = account.card.as_ref().unwrap();
        assert_eq!(card.number.len(), 16);
        assert!(card.number.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(card.cvv.len(), 3);
        assert_eq!(card.expires_on.month(), 12);
        assert_eq!(card.expires_on.day(), 31);

        assert!(store.contains("maria@example.com"));
    }

    #[test]
    fn test_duplicate_email_is_a_registration_issue() {
        let mut store = AccountStore::new();
        let policy = BankPolicy::default();
        Registrar::new(&mut store, &policy).register(&form()).unwrap();

        let err = Registrar::new(&mut store, &policy).register(&form()).unwrap_err();
        assert!(matches!(
            err,
            BankError::InvalidRegistration(ref issues) if issues == &vec![RegistrationIssue::EmailTaken]
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_opening_balance_books_nothing() {
        let mut store = AccountStore::new();
        let policy = BankPolicy::default().with_opening_balance(Decimal::ZERO);
        let account = Registrar::new(&mut store, &policy).register(&form()).unwrap();

        assert!(account.primary_balance.is_zero());
        assert!(account.transactions().is_empty());
    }

    #[test]
    fn test_issue_card_expiry() {
        let card = issue_card(&BankPolicy::default(), today());
        assert_eq!(card.expires_on, NaiveDate::from_ymd_opt(2031, 12, 31).unwrap());
        assert_ne!(card.number.chars().next(), Some('0'));
    }
}
