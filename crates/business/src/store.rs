//! AccountStore - in-memory account table
//!
//! Exclusive owner of every [`Account`]. Loaded from and flushed to a
//! [`PersistenceGateway`] as a whole.

use crate::error::{BankError, BankResult};
use minibank_core::Account;
use minibank_persistence::{AccountMap, PersistenceGateway, PersistenceResult};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountStore {
    accounts: AccountMap,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(accounts: AccountMap) -> Self {
        Self { accounts }
    }

    /// Load the whole table through a gateway
    pub fn load(gateway: &dyn PersistenceGateway) -> PersistenceResult<Self> {
        let accounts = gateway.load_all()?;
        debug!(accounts = accounts.len(), "account store loaded");
        Ok(Self { accounts })
    }

    /// Flush the whole table through a gateway
    pub fn save(&self, gateway: &dyn PersistenceGateway) -> PersistenceResult<()> {
        gateway.save_all(&self.accounts)?;
        debug!(accounts = self.accounts.len(), "account store saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    /// Look up an account, failing with `AccountNotFound`
    pub fn require(&self, id: &str) -> BankResult<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    pub fn require_mut(&mut self, id: &str) -> BankResult<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    /// Add a new account. Ids are unique.
    pub fn insert(&mut self, account: Account) -> BankResult<()> {
        if self.accounts.contains_key(&account.id) {
            return Err(BankError::AccountExists(account.id));
        }
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn as_map(&self) -> &AccountMap {
        &self.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::{Credential, PersonalInfo};
    use minibank_persistence::MemoryGateway;

    fn account(id: &str) -> Account {
        Account::new(
            id,
            PersonalInfo {
                first_name: "Pavel".to_string(),
                last_name: "Orlov".to_string(),
                phone: "+79261234567".to_string(),
                birth_date: None,
                address: None,
            },
            Credential::new("hash".to_string()),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = AccountStore::new();
        store.insert(account("pavel@example.com")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains("pavel@example.com"));
        assert!(store.require("pavel@example.com").is_ok());
        assert!(matches!(
            store.require("nobody@example.com"),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut store = AccountStore::new();
        store.insert(account("pavel@example.com")).unwrap();

        let err = store.insert(account("pavel@example.com")).unwrap_err();
        assert!(matches!(err, BankError::AccountExists(id) if id == "pavel@example.com"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let gateway = MemoryGateway::new();
        let mut store = AccountStore::new();
        store.insert(account("a@example.com")).unwrap();
        store.insert(account("b@example.com")).unwrap();
        store.save(&gateway).unwrap();

        let loaded = AccountStore::load(&gateway).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.ids().collect::<Vec<_>>(), vec!["a@example.com", "b@example.com"]);
    }
}
