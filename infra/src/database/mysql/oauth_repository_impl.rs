//! MySQL implementation of the OAuth client and token repositories.
//!
//! Opaque tokens are stored as SHA-256 digests. Rows read back carry the
//! digest in their `token` field; the plaintext only ever exists in the
//! response that minted it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use rh_core::domain::entities::oauth::{
    format_scopes, parse_scopes, OAuthAccessToken, OAuthClient, OAuthRefreshToken,
};
use rh_core::domain::entities::user::UserId;
use rh_core::errors::DomainError;
use rh_core::repositories::{OAuthClientRepository, OAuthTokenRepository};
use rh_core::services::secrets::sha256_hex;

use super::{db_error, insert_error};

const TOKEN_COLUMNS: &str = "id, user_id, client_id, token_hash, scopes, expires_at, created_at";

/// Columns shared by both token tables
struct TokenRow {
    id: Uuid,
    user_id: UserId,
    client_id: String,
    token_hash: String,
    scopes: Vec<String>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TokenRow {
    fn from_row(row: &MySqlRow) -> Result<Self, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
        let scopes: String = row.try_get("scopes").map_err(db_error("Failed to get scopes"))?;

        Ok(Self {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid token UUID: {}", e)))?,
            user_id: row.try_get("user_id").map_err(db_error("Failed to get user_id"))?,
            client_id: row
                .try_get("client_id")
                .map_err(db_error("Failed to get client_id"))?,
            token_hash: row
                .try_get("token_hash")
                .map_err(db_error("Failed to get token_hash"))?,
            scopes: parse_scopes(&scopes),
            expires_at: row
                .try_get("expires_at")
                .map_err(db_error("Failed to get expires_at"))?,
            created_at: row
                .try_get("created_at")
                .map_err(db_error("Failed to get created_at"))?,
        })
    }
}

impl From<TokenRow> for OAuthAccessToken {
    fn from(row: TokenRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            client_id: row.client_id,
            token: row.token_hash,
            scopes: row.scopes,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

impl From<TokenRow> for OAuthRefreshToken {
    fn from(row: TokenRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            client_id: row.client_id,
            token: row.token_hash,
            scopes: row.scopes,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

/// Backs both [`OAuthClientRepository`] and [`OAuthTokenRepository`]
pub struct MySqlOAuthRepository {
    pool: MySqlPool,
}

impl MySqlOAuthRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_token(
        &self,
        table: &'static str,
        id: Uuid,
        user_id: UserId,
        client_id: &str,
        token: &str,
        scopes: &[String],
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            table, TOKEN_COLUMNS
        );

        sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id)
            .bind(client_id)
            .bind(sha256_hex(token))
            .bind(format_scopes(scopes))
            .bind(expires_at)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(insert_error("Failed to save OAuth token"))?;

        Ok(())
    }

    async fn find_live_token(
        &self,
        table: &'static str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TokenRow>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE token_hash = ? AND expires_at > ? LIMIT 1",
            TOKEN_COLUMNS, table
        );

        let row = sqlx::query(&query)
            .bind(sha256_hex(token))
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find OAuth token"))?;

        row.as_ref().map(TokenRow::from_row).transpose()
    }
}

#[async_trait]
impl OAuthClientRepository for MySqlOAuthRepository {
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<OAuthClient>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, client_id, client_secret_hash, name, redirect_uri
            FROM oauth_clients
            WHERE client_id = ?
            LIMIT 1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find OAuth client"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(OAuthClient {
            id: row.try_get("id").map_err(db_error("Failed to get id"))?,
            client_id: row
                .try_get("client_id")
                .map_err(db_error("Failed to get client_id"))?,
            client_secret_hash: row
                .try_get("client_secret_hash")
                .map_err(db_error("Failed to get client_secret_hash"))?,
            name: row.try_get("name").map_err(db_error("Failed to get name"))?,
            redirect_uri: row
                .try_get("redirect_uri")
                .map_err(db_error("Failed to get redirect_uri"))?,
        }))
    }
}

#[async_trait]
impl OAuthTokenRepository for MySqlOAuthRepository {
    async fn save_access_token(&self, token: OAuthAccessToken) -> Result<(), DomainError> {
        self.insert_token(
            "oauth_access_tokens",
            token.id,
            token.user_id,
            &token.client_id,
            &token.token,
            &token.scopes,
            token.expires_at,
            token.created_at,
        )
        .await
    }

    async fn save_refresh_token(&self, token: OAuthRefreshToken) -> Result<(), DomainError> {
        self.insert_token(
            "oauth_refresh_tokens",
            token.id,
            token.user_id,
            &token.client_id,
            &token.token,
            &token.scopes,
            token.expires_at,
            token.created_at,
        )
        .await
    }

    async fn find_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthAccessToken>, DomainError> {
        Ok(self
            .find_live_token("oauth_access_tokens", token, now)
            .await?
            .map(Into::into))
    }

    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthRefreshToken>, DomainError> {
        Ok(self
            .find_live_token("oauth_refresh_tokens", token, now)
            .await?
            .map(Into::into))
    }

    async fn delete_access_tokens_for(
        &self,
        user_id: UserId,
        client_id: &str,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM oauth_access_tokens WHERE user_id = ? AND client_id = ?")
            .bind(user_id)
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete access tokens"))?;

        Ok(result.rows_affected())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, DomainError> {
        // Single-statement delete; concurrent callers see exactly one success
        let result = sqlx::query("DELETE FROM oauth_refresh_tokens WHERE token_hash = ?")
            .bind(sha256_hex(token))
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete refresh token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_token(&self, token: &str) -> Result<u64, DomainError> {
        let hash = sha256_hex(token);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let access = sqlx::query("DELETE FROM oauth_access_tokens WHERE token_hash = ?")
            .bind(&hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete access token"))?;
        let refresh = sqlx::query("DELETE FROM oauth_refresh_tokens WHERE token_hash = ?")
            .bind(&hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete refresh token"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit token deletion"))?;

        Ok(access.rows_affected() + refresh.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let access = sqlx::query("DELETE FROM oauth_access_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete expired access tokens"))?;
        let refresh = sqlx::query("DELETE FROM oauth_refresh_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete expired refresh tokens"))?;

        Ok(access.rows_affected() + refresh.rows_affected())
    }
}
