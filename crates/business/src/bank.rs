//! Bank - facade wiring the engine together
//!
//! Owns the [`AccountStore`], the [`PersistenceGateway`] and the
//! [`BankPolicy`]. Every committed mutation is followed by a whole-state
//! save. When that save fails the in-memory state stays as the new truth
//! and the caller gets [`BankError::Persistence`]; [`Bank::save`] retries.

use crate::config::BankPolicy;
use crate::credential::CredentialGuard;
use crate::credit::CreditModule;
use crate::error::{BankError, BankResult};
use crate::ledger::LedgerEngine;
use crate::registration::{RegistrationForm, Registrar};
use crate::savings::{project_yield, SavingsModule, YieldProjection};
use crate::session::Session;
use crate::store::AccountStore;
use minibank_core::{
    Account, Amount, HistoryQuery, LoanApplication, LoanStatus, TransactionRecord,
};
use minibank_persistence::PersistenceGateway;
use rust_decimal::Decimal;
use tracing::{error, info};

pub struct Bank {
    store: AccountStore,
    gateway: Box<dyn PersistenceGateway>,
    policy: BankPolicy,
}

impl Bank {
    /// Load the account table and start serving
    pub fn open(gateway: impl PersistenceGateway + 'static, policy: BankPolicy) -> BankResult<Self> {
        policy
            .validate()
            .map_err(|e| BankError::InvalidInput(e.to_string()))?;
        let store = AccountStore::load(&gateway)?;
        info!(accounts = store.len(), "bank opened");

        Ok(Self {
            store,
            gateway: Box::new(gateway),
            policy,
        })
    }

    pub fn policy(&self) -> &BankPolicy {
        &self.policy
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Flush the whole state. Also used to retry after a failed save.
    pub fn save(&self) -> BankResult<()> {
        self.store.save(self.gateway.as_ref()).map_err(|e| {
            error!(error = %e, "failed to save account store");
            BankError::Persistence(e)
        })
    }

    fn commit<T>(&self, value: T) -> BankResult<T> {
        self.save()?;
        Ok(value)
    }

    // === Accounts ===

    pub fn register(&mut self, form: &RegistrationForm) -> BankResult<Account> {
        let account = Registrar::new(&mut self.store, &self.policy).register(form)?;
        self.commit(account)
    }

    /// Check credentials and open a session.
    ///
    /// The credential state is saved on success and on failure, so the
    /// failed-attempt counter and lockout survive a restart.
    pub fn login(&mut self, account_id: &str, password: &str) -> BankResult<Session> {
        let guard = CredentialGuard::new(&self.policy);
        let account = self.store.require_mut(account_id)?;
        let outcome = guard.verify(account, password);

        self.save()?;
        outcome?;
        Ok(Session::new(account_id))
    }

    /// Issue a temporary password; returns the plaintext once
    pub fn reset_password(&mut self, account_id: &str) -> BankResult<String> {
        let guard = CredentialGuard::new(&self.policy);
        let account = self.store.require_mut(account_id)?;
        let temporary = guard.reset_password(account);
        self.commit(temporary)
    }

    pub fn account(&self, session: &Session) -> BankResult<&Account> {
        self.store.require(session.account_id())
    }

    pub fn balance(&self, session: &Session) -> BankResult<Amount> {
        Ok(self.account(session)?.primary_balance)
    }

    /// Filtered and sorted view of the session account's log
    pub fn history(
        &self,
        session: &Session,
        query: &HistoryQuery,
    ) -> BankResult<Vec<&TransactionRecord>> {
        Ok(self.account(session)?.transactions().query(query))
    }

    // === Ledger ===

    pub fn deposit(&mut self, session: &Session, amount: Decimal) -> BankResult<TransactionRecord> {
        let record =
            LedgerEngine::new(&mut self.store, &self.policy).deposit(session.account_id(), amount)?;
        self.commit(record)
    }

    pub fn withdraw(&mut self, session: &Session, amount: Decimal) -> BankResult<TransactionRecord> {
        let record =
            LedgerEngine::new(&mut self.store, &self.policy).withdraw(session.account_id(), amount)?;
        self.commit(record)
    }

    /// Returns the sender's `transfer_out` record
    pub fn transfer(
        &mut self,
        session: &Session,
        recipient_id: &str,
        amount: Decimal,
        note: Option<&str>,
    ) -> BankResult<TransactionRecord> {
        let (outgoing, _) = LedgerEngine::new(&mut self.store, &self.policy).transfer(
            session.account_id(),
            recipient_id,
            amount,
            note,
        )?;
        self.commit(outgoing)
    }

    // === Savings ===

    /// Returns true if a new savings sub-account was opened
    pub fn open_savings(&mut self, session: &Session) -> BankResult<bool> {
        let created = SavingsModule::new(&mut self.store, &self.policy).open(session.account_id())?;
        if created {
            self.save()?;
        }
        Ok(created)
    }

    pub fn move_to_savings(
        &mut self,
        session: &Session,
        amount: Decimal,
    ) -> BankResult<TransactionRecord> {
        let record = SavingsModule::new(&mut self.store, &self.policy)
            .move_to_savings(session.account_id(), amount)?;
        self.commit(record)
    }

    pub fn move_from_savings(
        &mut self,
        session: &Session,
        amount: Decimal,
    ) -> BankResult<TransactionRecord> {
        let record = SavingsModule::new(&mut self.store, &self.policy)
            .move_from_savings(session.account_id(), amount)?;
        self.commit(record)
    }

    pub fn projected_yield(&self, session: &Session) -> BankResult<YieldProjection> {
        self.account(session)?
            .savings
            .as_ref()
            .map(project_yield)
            .ok_or_else(|| BankError::SavingsNotOpen(session.account_id().to_string()))
    }

    // === Credit ===

    pub fn apply_for_credit(
        &mut self,
        session: &Session,
        amount: Decimal,
    ) -> BankResult<LoanApplication> {
        let application =
            CreditModule::new(&mut self.store, &self.policy).apply(session.account_id(), amount)?;
        self.commit(application)
    }

    /// Record a credit review decision on an account's loan.
    ///
    /// Keyed by account id like [`Bank::reset_password`]: the decision comes
    /// from the reviewing side, not from the borrower's session.
    pub fn record_loan_decision(
        &mut self,
        account_id: &str,
        reference: &str,
        status: LoanStatus,
    ) -> BankResult<LoanApplication> {
        let application = CreditModule::new(&mut self.store, &self.policy).record_decision(
            account_id,
            reference,
            status,
        )?;
        self.commit(application)
    }

    pub fn loans(&self, session: &Session) -> BankResult<&[LoanApplication]> {
        Ok(&self.account(session)?.credit_applications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::{HistorySort, TransactionKind};
    use minibank_persistence::{
        AccountMap, MemoryGateway, PersistenceError, PersistenceResult,
    };
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory gateway whose saves can be switched off
    #[derive(Default)]
    struct FlakyGateway {
        inner: MemoryGateway,
        failing: AtomicBool,
    }

    impl PersistenceGateway for FlakyGateway {
        fn load_all(&self) -> PersistenceResult<AccountMap> {
            self.inner.load_all()
        }

        fn save_all(&self, accounts: &AccountMap) -> PersistenceResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("disk full".to_string()));
            }
            self.inner.save_all(accounts)
        }
    }

    fn form(email: &str) -> RegistrationForm {
        RegistrationForm {
            email: email.to_string(),
            first_name: "Elena".to_string(),
            last_name: "Morozova".to_string(),
            phone: "+79165554433".to_string(),
            birth_date: Some("1988-02-29".to_string()),
            address: None,
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
        }
    }

    fn bank_with(gateway: Arc<MemoryGateway>) -> Bank {
        let mut bank = Bank::open(gateway, BankPolicy::default()).unwrap();
        bank.register(&form("elena@example.com")).unwrap();
        bank.register(&form("oleg@example.com")).unwrap();
        bank
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway.clone());
        assert_eq!(gateway.save_count(), 2);

        let session = bank.login("elena@example.com", "Passw0rd!").unwrap();
        bank.deposit(&session, dec!(500)).unwrap();
        bank.transfer(&session, "oleg@example.com", dec!(200), None).unwrap();

        let saved = gateway.snapshot();
        assert_eq!(saved["elena@example.com"].primary_balance.value(), dec!(1300));
        assert_eq!(saved["oleg@example.com"].primary_balance.value(), dec!(1200));
    }

    #[test]
    fn test_failed_operation_is_not_saved() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway.clone());
        let session = bank.login("elena@example.com", "Passw0rd!").unwrap();
        let saves = gateway.save_count();

        assert!(bank.withdraw(&session, dec!(5000)).is_err());
        assert_eq!(gateway.save_count(), saves);
    }

    #[test]
    fn test_failed_login_is_persisted() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway.clone());

        let err = bank.login("elena@example.com", "nope").unwrap_err();
        assert!(matches!(err, BankError::InvalidCredential { attempts_left: 4 }));
        assert_eq!(gateway.snapshot()["elena@example.com"].credential.failed_attempts, 1);

        let reopened = Bank::open(gateway.clone(), BankPolicy::default()).unwrap();
        assert_eq!(
            reopened.store().get("elena@example.com").unwrap().credential.failed_attempts,
            1
        );
    }

    #[test]
    fn test_unknown_login() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway);
        assert!(matches!(
            bank.login("nobody@example.com", "x"),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let gateway = Arc::new(FlakyGateway::default());
        let mut bank = Bank::open(gateway.clone(), BankPolicy::default()).unwrap();
        bank.register(&form("elena@example.com")).unwrap();
        let session = bank.login("elena@example.com", "Passw0rd!").unwrap();

        gateway.failing.store(true, Ordering::SeqCst);
        let err = bank.deposit(&session, dec!(100)).unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(bank.balance(&session).unwrap().value(), dec!(1100));

        gateway.failing.store(false, Ordering::SeqCst);
        bank.save().unwrap();
        assert_eq!(
            gateway.inner.snapshot()["elena@example.com"].primary_balance.value(),
            dec!(1100)
        );
    }

    #[test]
    fn test_savings_and_history() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway);
        let session = bank.login("oleg@example.com", "Passw0rd!").unwrap();

        assert!(bank.open_savings(&session).unwrap());
        assert!(!bank.open_savings(&session).unwrap());
        bank.move_to_savings(&session, dec!(600)).unwrap();
        bank.move_from_savings(&session, dec!(100)).unwrap();

        let projection = bank.projected_yield(&session).unwrap();
        assert_eq!(projection.balance, dec!(500));
        assert_eq!(projection.yearly, dec!(27.50));

        let history = bank
            .history(
                &session,
                &HistoryQuery::new().sorted_by(HistorySort::AmountAscending),
            )
            .unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].kind, TransactionKind::SavingsDeposit);

        let account = bank.account(&session).unwrap();
        assert_eq!(
            account.transactions().net_total(),
            account.primary_balance.value()
        );
    }

    #[test]
    fn test_credit_flow() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway.clone());
        let session = bank.login("oleg@example.com", "Passw0rd!").unwrap();

        assert!(matches!(
            bank.apply_for_credit(&session, dec!(10000.01)),
            Err(BankError::CreditLimitExceeded { .. })
        ));

        let loan = bank.apply_for_credit(&session, dec!(5000)).unwrap();
        bank.record_loan_decision("oleg@example.com", &loan.reference, LoanStatus::Approved)
            .unwrap();
        assert_eq!(bank.loans(&session).unwrap()[0].status, LoanStatus::Approved);
        assert_eq!(
            gateway.snapshot()["oleg@example.com"].credit_applications[0].status,
            LoanStatus::Approved
        );
    }

    #[test]
    fn test_loan_decision_is_scoped_to_the_account() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway);
        let session = bank.login("oleg@example.com", "Passw0rd!").unwrap();
        let loan = bank.apply_for_credit(&session, dec!(2000)).unwrap();

        assert!(matches!(
            bank.record_loan_decision("elena@example.com", &loan.reference, LoanStatus::Approved),
            Err(BankError::LoanNotFound(_))
        ));
        assert!(matches!(
            bank.record_loan_decision("nobody@example.com", &loan.reference, LoanStatus::Approved),
            Err(BankError::AccountNotFound(_))
        ));
        assert_eq!(bank.loans(&session).unwrap()[0].status, LoanStatus::Pending);
    }

    #[test]
    fn test_session_comes_from_successful_login() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway);

        assert!(bank.login("elena@example.com", "wrong").is_err());
        let session = bank.login("elena@example.com", "Passw0rd!").unwrap();
        assert_eq!(session.account_id(), "elena@example.com");
        assert_eq!(bank.account(&session).unwrap().id, "elena@example.com");

        let again = bank.login("elena@example.com", "Passw0rd!").unwrap();
        assert_ne!(session.id(), again.id());
    }

    #[test]
    fn test_reset_password() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut bank = bank_with(gateway);

        let temporary = bank.reset_password("elena@example.com").unwrap();
        assert!(bank.login("elena@example.com", "Passw0rd!").is_err());
        assert!(bank.login("elena@example.com", &temporary).is_ok());
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = BankPolicy::default().with_max_failed_attempts(0);
        assert!(matches!(
            Bank::open(MemoryGateway::new(), policy),
            Err(BankError::InvalidInput(_))
        ));
    }
}
