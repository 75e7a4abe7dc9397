//! MySQL implementation of the ApiKeyRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use rh_core::domain::entities::api_key::ApiKey;
use rh_core::domain::entities::user::UserId;
use rh_core::errors::DomainError;
use rh_core::repositories::ApiKeyRepository;

use super::{db_error, insert_error};

const KEY_COLUMNS: &str = "id, user_id, name, key_hash, scopes, expires_at, last_used_at, \
                           usage_count, is_active, created_at";

pub struct MySqlApiKeyRepository {
    pool: MySqlPool,
}

impl MySqlApiKeyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_key(row: &MySqlRow) -> Result<ApiKey, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
        let scopes: String = row.try_get("scopes").map_err(db_error("Failed to get scopes"))?;

        Ok(ApiKey {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid API key UUID: {}", e)))?,
            user_id: row.try_get("user_id").map_err(db_error("Failed to get user_id"))?,
            name: row.try_get("name").map_err(db_error("Failed to get name"))?,
            key_hash: row
                .try_get("key_hash")
                .map_err(db_error("Failed to get key_hash"))?,
            scopes: serde_json::from_str(&scopes)
                .map_err(|e| DomainError::internal(format!("Invalid scopes column: {}", e)))?,
            expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("expires_at")
                .map_err(db_error("Failed to get expires_at"))?,
            last_used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_used_at")
                .map_err(db_error("Failed to get last_used_at"))?,
            usage_count: row
                .try_get("usage_count")
                .map_err(db_error("Failed to get usage_count"))?,
            is_active: row
                .try_get("is_active")
                .map_err(db_error("Failed to get is_active"))?,
            created_at: row
                .try_get("created_at")
                .map_err(db_error("Failed to get created_at"))?,
        })
    }

    async fn insert(
        tx: &mut Transaction<'_, MySql>,
        key: &ApiKey,
    ) -> Result<(), DomainError> {
        let scopes = serde_json::to_string(&key.scopes)
            .map_err(|e| DomainError::internal(format!("Failed to encode scopes: {}", e)))?;
        let query = format!(
            "INSERT INTO api_keys ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            KEY_COLUMNS
        );

        sqlx::query(&query)
            .bind(key.id.to_string())
            .bind(key.user_id)
            .bind(&key.name)
            .bind(&key.key_hash)
            .bind(scopes)
            .bind(key.expires_at)
            .bind(key.last_used_at)
            .bind(key.usage_count)
            .bind(key.is_active)
            .bind(key.created_at)
            .execute(&mut **tx)
            .await
            .map_err(insert_error("Failed to save API key"))?;

        Ok(())
    }
}

#[async_trait]
impl ApiKeyRepository for MySqlApiKeyRepository {
    async fn create(&self, key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        Self::insert(&mut tx, &key).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit API key"))?;

        Ok(key)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let query = format!("SELECT {} FROM api_keys WHERE key_hash = ? LIMIT 1", KEY_COLUMNS);

        let row = sqlx::query(&query)
            .bind(key_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find API key"))?;

        row.as_ref().map(Self::row_to_key).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        let query = format!("SELECT {} FROM api_keys WHERE id = ? LIMIT 1", KEY_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find API key by id"))?;

        row.as_ref().map(Self::row_to_key).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApiKey>, DomainError> {
        let query = format!(
            "SELECT {} FROM api_keys WHERE user_id = ? ORDER BY created_at DESC",
            KEY_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list API keys"))?;

        rows.iter().map(Self::row_to_key).collect()
    }

    async fn record_usage(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE api_keys
            SET usage_count = usage_count + 1, last_used_at = ?
            WHERE id = ?
            "#,
        )
        .bind(used_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record API key usage"))?;

        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = FALSE WHERE id = ? AND is_active = TRUE")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to deactivate API key"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn rotate(&self, old_id: Uuid, replacement: ApiKey) -> Result<ApiKey, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let locked: Option<(bool,)> =
            sqlx::query_as("SELECT is_active FROM api_keys WHERE id = ? FOR UPDATE")
                .bind(old_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock API key"))?;
        match locked {
            None => return Err(DomainError::not_found("api_key")),
            // A concurrent rotation already retired this key
            Some((false,)) => return Err(DomainError::validation("API key is no longer active")),
            Some((true,)) => {}
        }

        sqlx::query("UPDATE api_keys SET is_active = FALSE WHERE id = ?")
            .bind(old_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to deactivate rotated API key"))?;
        Self::insert(&mut tx, &replacement).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit API key rotation"))?;

        Ok(replacement)
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE expires_at IS NOT NULL AND expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to purge expired API keys"))?;

        Ok(result.rows_affected())
    }
}
