//! Mock implementation of ApiKeyRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::api_key::ApiKey;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

use super::r#trait::ApiKeyRepository;

/// In-memory key table; a single write lock makes each operation atomic
#[derive(Clone, Default)]
pub struct MockApiKeyRepository {
    keys: Arc<RwLock<HashMap<Uuid, ApiKey>>>,
}

impl MockApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }
}

#[async_trait]
impl ApiKeyRepository for MockApiKeyRepository {
    async fn create(&self, key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        if keys.values().any(|k| k.key_hash == key.key_hash) {
            return Err(DomainError::validation("API key already exists"));
        }
        keys.insert(key.id, key.clone());
        Ok(key)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.values().find(|k| k.key_hash == key_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        Ok(self.keys.read().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        let mut owned: Vec<ApiKey> = keys.values().filter(|k| k.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn record_usage(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut keys = self.keys.write().await;
        if let Some(key) = keys.get_mut(&id) {
            key.last_used_at = Some(used_at);
            key.usage_count += 1;
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;
        match keys.get_mut(&id) {
            Some(key) => {
                key.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rotate(&self, old_id: Uuid, replacement: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        match keys.get_mut(&old_id) {
            Some(old) if old.is_active => old.is_active = false,
            Some(_) => return Err(DomainError::validation("API key is no longer active")),
            None => return Err(DomainError::not_found("api_key")),
        }
        keys.insert(replacement.id, replacement.clone());
        Ok(replacement)
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut keys = self.keys.write().await;
        let before = keys.len();
        keys.retain(|_, k| !matches!(k.expires_at, Some(at) if at < cutoff));
        Ok((before - keys.len()) as u64)
    }
}
