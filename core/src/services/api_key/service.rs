//! API key service
//!
//! Keys look like `rh_<64 hex chars>`. Only the SHA-256 of the full key is
//! stored, so a key is shown exactly once, at creation or rotation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rh_shared::config::ApiKeyConfig;
use rh_shared::utils::mask::mask_secret;
use rh_shared::utils::validation::{is_valid_scope, validators};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::api_key::ApiKey;
use crate::domain::entities::audit::{AuditEvent, AuditEventType};
use crate::domain::entities::user::UserId;
use crate::domain::value_objects::ApiKeyCreated;
use crate::errors::DomainError;
use crate::repositories::ApiKeyRepository;
use crate::services::audit::AuditService;
use crate::services::secrets::{digests_match, random_hex, sha256_hex};

/// Random bytes after the prefix
const KEY_BYTES: usize = 32;

/// Longest accepted key name
const MAX_NAME_LENGTH: usize = 100;

pub struct ApiKeyService<R: ApiKeyRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    audit: AuditService,
    config: ApiKeyConfig,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    pub fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        audit: AuditService,
        config: ApiKeyConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            audit,
            config,
        }
    }

    /// Creates a key; the returned plaintext is never retrievable again
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner
    /// * `name` - Label, 1 to 100 characters
    /// * `scopes` - Granted scopes; empty grants full access
    /// * `expires_at` - Expiry; falls back to the configured default lifetime
    pub async fn generate(
        &self,
        user_id: UserId,
        name: &str,
        scopes: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiKeyCreated, DomainError> {
        if !validators::not_empty(name) || !validators::length_between(name, 1, MAX_NAME_LENGTH) {
            return Err(DomainError::validation("API key name must be 1-100 characters"));
        }
        if let Some(bad) = scopes.iter().find(|s| !is_valid_scope(s)) {
            return Err(DomainError::validation(format!("Invalid scope: {}", bad)));
        }

        let now = self.clock.now();
        let expires_at = expires_at.or_else(|| {
            self.config
                .default_ttl_days
                .map(|days| now + Duration::days(days))
        });

        let (plaintext, record) = self.build(user_id, name, scopes, expires_at, now);
        let record = self.repository.create(record).await?;

        info!(user_id, key_id = %record.id, key = %mask_secret(&plaintext), "API key created");
        self.audit
            .record(
                AuditEvent::new(AuditEventType::ApiKeyCreated, now)
                    .with_user(user_id)
                    .with_metadata(serde_json::json!({ "key_id": record.id })),
            )
            .await;

        Ok(ApiKeyCreated {
            id: record.id,
            key: plaintext,
            name: record.name,
            expires_at: record.expires_at,
        })
    }

    /// Resolves a presented key and records its use
    ///
    /// Successful validation updates `last_used_at` and `usage_count` in the
    /// store. Unknown, revoked and expired keys all yield `None`.
    pub async fn validate(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        if !key.starts_with(&self.config.prefix) {
            debug!(key = %mask_secret(key), "API key without expected prefix");
            return Ok(None);
        }

        let hash = sha256_hex(key);
        let Some(mut record) = self.repository.find_by_hash(&hash).await? else {
            debug!(key = %mask_secret(key), "Unknown API key");
            return Ok(None);
        };
        if !digests_match(&record.key_hash, &hash) {
            return Ok(None);
        }

        let now = self.clock.now();
        if !record.is_usable_at(now) {
            debug!(key_id = %record.id, active = record.is_active, "Unusable API key presented");
            self.audit
                .record(
                    AuditEvent::new(AuditEventType::ApiKeyRejected, now)
                        .with_user(record.user_id)
                        .with_failure(if record.is_active { "Expired" } else { "Revoked" }),
                )
                .await;
            return Ok(None);
        }

        self.repository.record_usage(record.id, now).await?;
        record.last_used_at = Some(now);
        record.usage_count += 1;
        Ok(Some(record))
    }

    /// Deactivates a key; the row is kept until the retention sweep
    pub async fn revoke(&self, id: Uuid) -> Result<bool, DomainError> {
        let revoked = self.repository.deactivate(id).await?;
        if revoked {
            info!(key_id = %id, "API key revoked");
            self.audit
                .record(
                    AuditEvent::new(AuditEventType::ApiKeyRevoked, self.clock.now())
                        .with_metadata(serde_json::json!({ "key_id": id })),
                )
                .await;
        }
        Ok(revoked)
    }

    /// Replaces a key with a new one carrying the same name, scopes and expiry
    ///
    /// The replacement is inserted and the old key deactivated in a single
    /// repository transaction.
    pub async fn rotate(&self, old_id: Uuid) -> Result<ApiKeyCreated, DomainError> {
        let old = self
            .repository
            .find_by_id(old_id)
            .await?
            .ok_or_else(|| DomainError::not_found("api_key"))?;

        let now = self.clock.now();
        if !old.is_usable_at(now) {
            return Err(DomainError::validation("Only active, unexpired keys can be rotated"));
        }

        let (plaintext, replacement) =
            self.build(old.user_id, &old.name, old.scopes.clone(), old.expires_at, now);
        let replacement = self.repository.rotate(old_id, replacement).await?;

        info!(old_key_id = %old_id, new_key_id = %replacement.id, "API key rotated");
        self.audit
            .record(
                AuditEvent::new(AuditEventType::ApiKeyRotated, now)
                    .with_user(old.user_id)
                    .with_metadata(serde_json::json!({
                        "old_key_id": old_id,
                        "new_key_id": replacement.id,
                    })),
            )
            .await;

        Ok(ApiKeyCreated {
            id: replacement.id,
            key: plaintext,
            name: replacement.name,
            expires_at: replacement.expires_at,
        })
    }

    /// Whether a key grants a scope; keys without scopes grant everything
    pub fn has_scope(&self, key: &ApiKey, scope: &str) -> bool {
        key.has_scope(scope)
    }

    /// Keys owned by a user
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list_for_user(user_id).await
    }

    /// Hard-deletes keys that expired longer ago than the retention period
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let cutoff = self.clock.now() - Duration::days(self.config.retention_days);
        let purged = self.repository.purge_expired_before(cutoff).await?;
        if purged > 0 {
            info!(purged, cutoff = %cutoff, "Purged expired API keys");
        }
        Ok(purged)
    }

    fn build(
        &self,
        user_id: UserId,
        name: &str,
        scopes: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> (String, ApiKey) {
        let plaintext = format!("{}{}", self.config.prefix, random_hex(KEY_BYTES));
        let record = ApiKey::new(user_id, name, sha256_hex(&plaintext), scopes, expires_at, now);
        (plaintext, record)
    }
}
