//! CredentialGuard - password hashing, verification and lockout
//!
//! Hash = hex(SHA-256(salt || password)). The salt is application wide
//! and comes from [`BankPolicy::password_salt`].

use crate::config::BankPolicy;
use crate::error::{BankError, BankResult};
use chrono::Utc;
use minibank_core::Account;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

pub struct CredentialGuard<'a> {
    policy: &'a BankPolicy,
}

impl<'a> CredentialGuard<'a> {
    pub fn new(policy: &'a BankPolicy) -> Self {
        Self { policy }
    }

    /// Deterministic salted digest of a password
    pub fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.policy.password_salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check a password against the account's credential.
    ///
    /// Mutates the failed-attempt counter, the active flag and the last
    /// login time. The caller must persist the account whatever the outcome.
    pub fn verify(&self, account: &mut Account, password: &str) -> BankResult<()> {
        if !account.credential.active {
            warn!(account = %account.id, "login attempt on locked account");
            return Err(BankError::AccountLocked(account.id.clone()));
        }

        let credential = &mut account.credential;
        if self.hash(password) != credential.password_hash {
            credential.failed_attempts += 1;
            if credential.failed_attempts >= self.policy.max_failed_attempts {
                credential.active = false;
                warn!(
                    account = %account.id,
                    attempts = credential.failed_attempts,
                    "account locked after failed logins"
                );
                return Err(BankError::AccountLocked(account.id.clone()));
            }

            let attempts_left = self.policy.max_failed_attempts - credential.failed_attempts;
            warn!(account = %account.id, attempts_left, "invalid password");
            return Err(BankError::InvalidCredential { attempts_left });
        }

        credential.failed_attempts = 0;
        credential.last_login = Some(Utc::now());
        info!(account = %account.id, "login succeeded");
        Ok(())
    }

    /// Replace the password with a random temporary one.
    ///
    /// Only the hash is stored; the plaintext is returned once. The lock
    /// state is left as it was.
    pub fn reset_password(&self, account: &mut Account) -> String {
        let temporary: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.policy.temp_password_length)
            .map(char::from)
            .collect();

        account.credential.password_hash = self.hash(&temporary);
        info!(account = %account.id, "password reset");
        temporary
    }
}
