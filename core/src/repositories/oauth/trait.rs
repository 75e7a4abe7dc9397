//! OAuth2 repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::oauth::{OAuthAccessToken, OAuthClient, OAuthRefreshToken};
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Read access to registered OAuth2 clients
#[async_trait]
pub trait OAuthClientRepository: Send + Sync {
    /// Find a client by its public client identifier
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<OAuthClient>, DomainError>;
}

/// Persistence for opaque OAuth2 tokens
///
/// Tokens are looked up by exact string match. Lookups take the current
/// instant and must not return rows whose expiry has passed.
#[async_trait]
pub trait OAuthTokenRepository: Send + Sync {
    async fn save_access_token(&self, token: OAuthAccessToken) -> Result<(), DomainError>;

    async fn save_refresh_token(&self, token: OAuthRefreshToken) -> Result<(), DomainError>;

    /// Find an unexpired access token
    async fn find_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthAccessToken>, DomainError>;

    /// Find an unexpired refresh token
    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthRefreshToken>, DomainError>;

    /// Delete every access token issued to a user through a client
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows deleted
    async fn delete_access_tokens_for(
        &self,
        user_id: UserId,
        client_id: &str,
    ) -> Result<u64, DomainError>;

    /// Delete a refresh token by value
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the row
    /// * `Ok(false)` - No such row
    async fn delete_refresh_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete a token by value from both the access and refresh tables
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows deleted across both tables
    async fn delete_token(&self, token: &str) -> Result<u64, DomainError>;

    /// Delete access and refresh rows that expired before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
