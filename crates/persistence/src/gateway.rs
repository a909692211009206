//! PersistenceGateway contract and an in-memory implementation
//!
//! Both operations work on the whole state: there is no partial or
//! incremental persistence.

use crate::error::{PersistenceError, PersistenceResult};
use minibank_core::Account;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Every account, keyed by account id
pub type AccountMap = BTreeMap<String, Account>;

/// Whole-state storage for the account table.
///
/// `save_all` must either fully succeed or leave the previously saved
/// state intact.
pub trait PersistenceGateway {
    /// Load every account. An absent store loads as empty.
    fn load_all(&self) -> PersistenceResult<AccountMap>;

    /// Replace the stored state with `accounts`.
    fn save_all(&self, accounts: &AccountMap) -> PersistenceResult<()>;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    fn load_all(&self) -> PersistenceResult<AccountMap> {
        (**self).load_all()
    }

    fn save_all(&self, accounts: &AccountMap) -> PersistenceResult<()> {
        (**self).save_all(accounts)
    }
}

/// Gateway keeping the state in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<AccountMap>,
    saves: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state
    pub fn with_accounts(accounts: AccountMap) -> Self {
        Self {
            state: Mutex::new(accounts),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save_all` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the last saved state
    pub fn snapshot(&self) -> AccountMap {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load_all(&self) -> PersistenceResult<AccountMap> {
        self.state
            .lock()
            .map(|s| s.clone())
            .map_err(|_| PersistenceError::Unavailable("memory store poisoned".to_string()))
    }

    fn save_all(&self, accounts: &AccountMap) -> PersistenceResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store poisoned".to_string()))?;
        *state = accounts.clone();
        drop(state);

        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
