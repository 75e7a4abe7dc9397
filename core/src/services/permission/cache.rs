//! Versioned permission cache in the ledger
//!
//! Each user has a generation counter. The cached set lives under a key that
//! embeds the current generation, so bumping the counter orphans every older
//! entry at once and a slow reader can never write a stale set over a newer
//! generation's key.

use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::permission::PermissionSet;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;
use crate::repositories::{ledger_keys, LedgerStore};

#[derive(Clone)]
pub struct PermissionCache {
    ledger: Arc<dyn LedgerStore>,
    ttl_seconds: u64,
}

impl PermissionCache {
    pub fn new(ledger: Arc<dyn LedgerStore>, ttl_seconds: u64) -> Self {
        Self {
            ledger,
            ttl_seconds,
        }
    }

    /// Current generation for a user; 0 before the first invalidation
    pub async fn version(&self, user_id: UserId) -> Result<i64, DomainError> {
        let raw = self.ledger.get(&ledger_keys::permission_version(user_id)).await?;
        Ok(raw.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    /// Cached set for a generation
    ///
    /// An entry that no longer deserializes is treated as a miss.
    pub async fn get(
        &self,
        user_id: UserId,
        version: i64,
    ) -> Result<Option<PermissionSet>, DomainError> {
        let key = ledger_keys::permissions(user_id, version);
        let Some(raw) = self.ledger.get(&key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(set) => Ok(Some(set)),
            Err(e) => {
                warn!(user_id, error = %e, "Discarding unreadable permission cache entry");
                Ok(None)
            }
        }
    }

    pub async fn put(
        &self,
        user_id: UserId,
        version: i64,
        permissions: &PermissionSet,
    ) -> Result<(), DomainError> {
        let value = serde_json::to_string(permissions)
            .map_err(|e| DomainError::internal(format!("Permission set encoding failed: {}", e)))?;
        self.ledger
            .put(&ledger_keys::permissions(user_id, version), &value, self.ttl_seconds)
            .await
    }

    /// Moves a user to a new generation
    pub async fn invalidate(&self, user_id: UserId) -> Result<(), DomainError> {
        self.ledger
            .increment(&ledger_keys::permission_version(user_id))
            .await?;
        Ok(())
    }
}
