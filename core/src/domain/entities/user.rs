//! Principal (user) entity as seen by the identity subsystem.
//!
//! Users are owned by the credential store. This subsystem only reads the
//! identifier, email, role label and lock-until timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric user identifier assigned by the credential store
pub type UserId = i64;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,

    /// Login email address
    pub email: String,

    /// Primary role label (e.g. `admin`, `owner`, `guest`)
    pub role: String,

    /// The account cannot authenticate until this instant
    pub locked_until: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new unlocked user
    pub fn new(id: UserId, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: role.into(),
            locked_until: None,
        }
    }

    /// Checks whether the account is locked at the given instant
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Snapshot embedded in access tokens
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// The subset of a user carried inside an access token, so that downstream
/// authorization does not need a user lookup on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub email: String,
    pub role: String,
}
