//! Refresh token manager
//!
//! A refresh token is valid only while its `refresh:<jti>` ledger entry
//! lives. Revocation deletes the entry, which overrides an otherwise valid
//! signature and expiry.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::token::{ClientContext, RefreshClaims, RefreshTokenMetadata, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{ledger_keys, LedgerStore, UserRepository};

use super::access::AccessTokenIssuer;
use super::codec::TokenCodec;

pub struct RefreshTokenManager<U: UserRepository> {
    codec: Arc<TokenCodec>,
    ledger: Arc<dyn LedgerStore>,
    users: Arc<U>,
    access: Arc<AccessTokenIssuer>,
    clock: Arc<dyn Clock>,
    ttl: i64,
}

impl<U: UserRepository> RefreshTokenManager<U> {
    pub fn new(
        codec: Arc<TokenCodec>,
        ledger: Arc<dyn LedgerStore>,
        users: Arc<U>,
        access: Arc<AccessTokenIssuer>,
        clock: Arc<dyn Clock>,
        ttl: i64,
    ) -> Self {
        Self {
            codec,
            ledger,
            users,
            access,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Mints a refresh token and records its ledger entry for the same lifetime
    pub async fn issue(&self, user: &User, context: &ClientContext) -> Result<String, DomainError> {
        let jti = Uuid::new_v4().to_string();
        let claims = RefreshClaims::new(
            self.codec.issuer(),
            user.id,
            jti.clone(),
            self.codec.now(),
            self.ttl,
        );
        let token = self.codec.sign(&claims)?;

        let metadata = RefreshTokenMetadata::new(user.id, self.clock.now(), context);
        let value = serde_json::to_string(&metadata)
            .map_err(|e| DomainError::internal(format!("Failed to encode refresh metadata: {}", e)))?;
        self.ledger
            .put(&ledger_keys::refresh(&jti), &value, self.ttl as u64)
            .await?;

        debug!(user_id = user.id, jti = %jti, "Refresh token issued");
        Ok(token)
    }

    /// Verifies the token, its type and its ledger entry
    pub async fn validate(&self, token: &str) -> Result<RefreshClaims, DomainError> {
        let claims: RefreshClaims = self.codec.verify(token).map_err(|e| {
            debug!(kind = e.kind(), "Refresh token rejected");
            e
        })?;

        if claims.token_type != TokenType::Refresh {
            debug!(jti = %claims.jti, "Access token presented as refresh token");
            return Err(TokenError::WrongType {
                expected: TokenType::Refresh.to_string(),
            }
            .into());
        }

        if !self.ledger.exists(&ledger_keys::refresh(&claims.jti)).await? {
            debug!(jti = %claims.jti, "Refresh token has no live ledger entry");
            return Err(TokenError::Revoked.into());
        }

        Ok(claims)
    }

    /// Revokes a refresh token by deleting its ledger entry
    ///
    /// Unreadable or already revoked tokens are a successful no-op.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A live entry was removed
    /// * `Ok(false)` - Nothing to revoke
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        let claims: RefreshClaims = match self.codec.decode_signed(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(kind = e.kind(), "Ignoring revocation of unreadable refresh token");
                return Ok(false);
            }
        };

        if claims.token_type != TokenType::Refresh {
            return Ok(false);
        }

        let removed = self.ledger.delete(&ledger_keys::refresh(&claims.jti)).await?;
        if removed {
            info!(jti = %claims.jti, user_id = %claims.sub, "Refresh token revoked");
        }
        Ok(removed)
    }

    /// Issues a new access token; the refresh token itself is kept
    pub async fn refresh(&self, token: &str) -> Result<String, DomainError> {
        let claims = self.validate(token).await?;
        let user = self.load_user(&claims).await?;
        self.access.issue(&user)
    }

    /// Consumes the refresh token and issues a new access and refresh token
    ///
    /// The old entry is deleted before anything is minted; only the caller
    /// whose delete succeeds proceeds, so concurrent rotations of one token
    /// produce a single new pair.
    pub async fn rotate(
        &self,
        token: &str,
        context: &ClientContext,
    ) -> Result<(String, String), DomainError> {
        let claims = self.validate(token).await?;
        let user = self.load_user(&claims).await?;

        if !self.ledger.delete(&ledger_keys::refresh(&claims.jti)).await? {
            debug!(jti = %claims.jti, "Refresh token consumed concurrently");
            return Err(TokenError::Revoked.into());
        }

        let access_token = self.access.issue(&user)?;
        let refresh_token = self.issue(&user, context).await?;
        Ok((access_token, refresh_token))
    }

    /// Metadata recorded when the token was issued
    pub async fn metadata(&self, token: &str) -> Result<Option<RefreshTokenMetadata>, DomainError> {
        let claims = self.validate(token).await?;
        let Some(raw) = self.ledger.get(&ledger_keys::refresh(&claims.jti)).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DomainError::internal(format!("Corrupt refresh metadata: {}", e)))
    }

    async fn load_user(&self, claims: &RefreshClaims) -> Result<User, DomainError> {
        let user_id = claims.user_id().ok_or(TokenError::Malformed)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if user.is_locked_at(self.clock.now()) {
            debug!(user_id, "Refresh refused for locked account");
            return Err(AuthError::AccountLocked.into());
        }
        Ok(user)
    }
}
