//! Session - an authenticated caller
//!
//! Returned by `Bank::login` and passed explicitly into every
//! account-scoped call instead of a global "current user".

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Only `Bank::login` can mint one; the fields are not constructible from outside.
///
/// ```compile_fail
/// use minibank_business::Session;
///
/// let forged = Session {
///     id: uuid::Uuid::new_v4(),
///     account_id: "victim@example.com".to_string(),
///     started_at: chrono::Utc::now(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: Uuid,
    account_id: String,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for an account that already passed credential checks
    pub(crate) fn new(account_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: account_id.into(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {} for {}", self.id, self.account_id)
    }
}
