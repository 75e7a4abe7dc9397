//! API key repository trait defining the interface for key persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::api_key::ApiKey;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Repository trait for ApiKey persistence operations
///
/// Keys are stored by hash only. Implementations must apply usage updates
/// with a single atomic statement so concurrent validations of the same key
/// never lose increments.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Persist a new key
    async fn create(&self, key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Find a key by the SHA-256 hash of its plaintext
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError>;

    /// All keys owned by a user, newest first
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiKey>, DomainError>;

    /// Set `last_used_at` and increment `usage_count` in one atomic update
    async fn record_usage(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Clear the active flag
    ///
    /// # Returns
    /// * `Ok(true)` - Key existed
    /// * `Ok(false)` - No such key
    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Insert `replacement` and deactivate `old_id` as one unit
    ///
    /// Either both changes are applied or neither is, so a failure can never
    /// leave two live keys. Fails with a validation error when `old_id` is
    /// already inactive, so only one of several concurrent rotations wins.
    async fn rotate(&self, old_id: Uuid, replacement: ApiKey) -> Result<ApiKey, DomainError>;

    /// Hard-delete keys whose expiry is earlier than `cutoff`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of keys deleted
    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
