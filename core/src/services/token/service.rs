//! Token service facade for login, authentication, refresh and logout

use std::sync::Arc;

use rh_shared::config::JwtConfig;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::entities::audit::{AuditEvent, AuditEventType};
use crate::domain::entities::token::{AccessClaims, ClientContext};
use crate::domain::entities::user::User;
use crate::domain::value_objects::TokenPair;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{LedgerStore, UserRepository};
use crate::services::audit::AuditService;

use super::access::AccessTokenIssuer;
use super::codec::TokenCodec;
use super::refresh::RefreshTokenManager;

/// Returns the credential from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively; a missing or empty credential
/// yields `None`.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let header = header.trim();
    let (scheme, credential) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

/// Service for managing JWT access and refresh tokens
pub struct TokenService<U: UserRepository> {
    access: Arc<AccessTokenIssuer>,
    refresh: RefreshTokenManager<U>,
    audit: AuditService,
    clock: Arc<dyn Clock>,
    rotate_refresh_tokens: bool,
}

impl<U: UserRepository> TokenService<U> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - JWT configuration (secret, algorithm, lifetimes)
    /// * `ledger` - Ledger for refresh entries and the denylist
    /// * `users` - User lookup for refresh
    /// * `clock` - Time source
    /// * `audit` - Audit dispatcher
    pub fn new(
        config: &JwtConfig,
        ledger: Arc<dyn LedgerStore>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        audit: AuditService,
    ) -> Result<Self, DomainError> {
        let codec = Arc::new(TokenCodec::new(config, clock.clone())?);
        let access = Arc::new(AccessTokenIssuer::new(
            codec.clone(),
            ledger.clone(),
            config.access_token_ttl,
        ));
        let refresh = RefreshTokenManager::new(
            codec,
            ledger,
            users,
            access.clone(),
            clock.clone(),
            config.refresh_token_ttl,
        );

        Ok(Self {
            access,
            refresh,
            audit,
            clock,
            rotate_refresh_tokens: config.rotate_refresh_tokens,
        })
    }

    pub fn access_tokens(&self) -> &AccessTokenIssuer {
        &self.access
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenManager<U> {
        &self.refresh
    }

    /// Issues an access and refresh token pair for an authenticated user
    ///
    /// Credential checking happens upstream; this refuses locked accounts.
    pub async fn login(&self, user: &User, context: &ClientContext) -> Result<TokenPair, DomainError> {
        let now = self.clock.now();
        if user.is_locked_at(now) {
            warn!(user_id = user.id, "Login refused for locked account");
            self.audit
                .record(
                    AuditEvent::new(AuditEventType::LoginFailure, now)
                        .with_user(user.id)
                        .with_failure("AccountLocked"),
                )
                .await;
            return Err(AuthError::AccountLocked.into());
        }

        let access_token = self.access.issue(user)?;
        let refresh_token = self.refresh.issue(user, context).await?;

        info!(user_id = user.id, "User logged in");
        self.audit
            .record(AuditEvent::new(AuditEventType::LoginSuccess, now).with_user(user.id))
            .await;

        Ok(TokenPair::new(access_token, refresh_token, self.access.ttl()))
    }

    /// Authenticates a bearer token
    pub async fn authenticate(&self, token: &str) -> Result<AccessClaims, DomainError> {
        match self.access.verify(token).await {
            Ok(claims) => Ok(claims),
            Err(e) => {
                self.audit
                    .record(
                        AuditEvent::new(AuditEventType::TokenValidationFailure, self.clock.now())
                            .with_failure(e.kind()),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Authenticates the value of an `Authorization` header
    pub async fn authenticate_header(&self, header: &str) -> Result<AccessClaims, DomainError> {
        let token = extract_bearer(header).ok_or(AuthError::Unauthenticated)?;
        self.authenticate(token).await
    }

    /// Exchanges a refresh token for a new pair
    ///
    /// Without rotation the presented refresh token is returned unchanged
    /// alongside the new access token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        context: &ClientContext,
    ) -> Result<TokenPair, DomainError> {
        let pair = if self.rotate_refresh_tokens {
            self.refresh_with_rotation(refresh_token, context).await?
        } else {
            let access_token = self.refresh.refresh(refresh_token).await?;
            TokenPair::new(access_token, refresh_token.to_string(), self.access.ttl())
        };

        self.audit
            .record(AuditEvent::new(AuditEventType::TokenRefreshed, self.clock.now()))
            .await;
        Ok(pair)
    }

    /// Consumes the refresh token and issues a fresh pair
    pub async fn refresh_with_rotation(
        &self,
        refresh_token: &str,
        context: &ClientContext,
    ) -> Result<TokenPair, DomainError> {
        let (access_token, new_refresh_token) = self.refresh.rotate(refresh_token, context).await?;
        Ok(TokenPair::new(access_token, new_refresh_token, self.access.ttl()))
    }

    /// Denylists an access token until it would have expired
    pub async fn revoke_access_token(&self, token: &str) -> Result<bool, DomainError> {
        self.access.revoke(token).await
    }

    /// Ends a session
    ///
    /// The access token is denylisted and the refresh token revoked. Both
    /// steps are attempted even if the first fails; invalid tokens are ignored.
    pub async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), DomainError> {
        let access_result = self.access.revoke(access_token).await;
        let refresh_result = self.refresh.revoke(refresh_token).await;

        debug!(
            access_revoked = ?access_result.as_ref().ok(),
            refresh_revoked = ?refresh_result.as_ref().ok(),
            "Logout processed"
        );
        self.audit
            .record(AuditEvent::new(AuditEventType::Logout, self.clock.now()))
            .await;

        access_result?;
        refresh_result?;
        Ok(())
    }
}
