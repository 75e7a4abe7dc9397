//! API key entity for machine-to-machine access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::wildcard_matches;
use super::user::UserId;

/// A stored API key record
///
/// The plaintext key is never stored; only its SHA-256 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,

    /// Owner of the key
    pub user_id: UserId,

    /// Human-readable label
    pub name: String,

    /// Hex-encoded SHA-256 of the plaintext key
    #[serde(skip_serializing)]
    pub key_hash: String,

    /// Granted scopes; empty means full access
    pub scopes: Vec<String>,

    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub usage_count: i64,

    /// Cleared on revocation; revoked keys are kept until the retention sweep
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Creates a new active key record
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        key_hash: impl Into<String>,
        scopes: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            key_hash: key_hash.into(),
            scopes,
            expires_at,
            last_used_at: None,
            usage_count: 0,
            is_active: true,
            created_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }

    /// Active and not expired
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Checks whether the key grants a scope
    ///
    /// A key without scopes has full access. Otherwise the scope must be
    /// granted exactly, by `*`, or by a `prefix.*` wildcard.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|granted| wildcard_matches(granted, scope))
    }
}
