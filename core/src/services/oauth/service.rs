//! OAuth2 exchange service

use std::sync::Arc;

use chrono::Duration;
use rh_shared::config::OAuthConfig;
use rh_shared::utils::mask::mask_secret;
use rh_shared::utils::validation::is_valid_scope;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::audit::{AuditEvent, AuditEventType};
use crate::domain::entities::oauth::{
    format_scopes, AuthorizationCode, OAuthAccessToken, OAuthClient, OAuthRefreshToken,
};
use crate::domain::entities::user::UserId;
use crate::domain::value_objects::{IntrospectionResponse, OAuthTokenResponse};
use crate::errors::{DomainError, OAuthError};
use crate::repositories::{ledger_keys, LedgerStore, OAuthClientRepository, OAuthTokenRepository};
use crate::services::audit::AuditService;
use crate::services::secrets::{bcrypt_verify, random_hex};

/// Random bytes in codes and opaque tokens
const TOKEN_BYTES: usize = 32;

pub struct OAuthService<C, T>
where
    C: OAuthClientRepository,
    T: OAuthTokenRepository,
{
    clients: Arc<C>,
    tokens: Arc<T>,
    ledger: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    audit: AuditService,
    config: OAuthConfig,
}

impl<C, T> OAuthService<C, T>
where
    C: OAuthClientRepository,
    T: OAuthTokenRepository,
{
    pub fn new(
        clients: Arc<C>,
        tokens: Arc<T>,
        ledger: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        audit: AuditService,
        config: OAuthConfig,
    ) -> Self {
        Self {
            clients,
            tokens,
            ledger,
            clock,
            audit,
            config,
        }
    }

    /// Issues a single-use authorization code after the user approved a client
    ///
    /// # Returns
    ///
    /// * `Err(OAuthError::InvalidClient)` - Unknown client
    /// * `Err(OAuthError::InvalidScope)` - A scope outside the permission alphabet
    pub async fn issue_authorization_code(
        &self,
        user_id: UserId,
        client_id: &str,
        scopes: &[String],
    ) -> Result<String, DomainError> {
        let client = self
            .clients
            .find_by_client_id(client_id)
            .await?
            .ok_or(OAuthError::InvalidClient)?;

        if let Some(bad) = scopes.iter().find(|s| !is_valid_scope(s)) {
            return Err(OAuthError::InvalidScope { scope: bad.clone() }.into());
        }

        let code = random_hex(TOKEN_BYTES);
        let entry = AuthorizationCode {
            user_id,
            client_id: client.client_id.clone(),
            scopes: scopes.to_vec(),
            redirect_uri: client.redirect_uri.clone(),
            created_at: self.clock.now(),
        };
        let value = serde_json::to_string(&entry)
            .map_err(|e| DomainError::internal(format!("Failed to encode authorization code: {}", e)))?;

        self.ledger
            .put(
                &ledger_keys::oauth_code(&code),
                &value,
                self.config.authorization_code_ttl,
            )
            .await?;

        debug!(user_id, client_id, code = %mask_secret(&code), "Authorization code issued");
        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthorizationCodeIssued, entry.created_at)
                    .with_user(user_id)
                    .with_client(client_id),
            )
            .await;

        Ok(code)
    }

    /// Exchanges an authorization code for an opaque token pair
    ///
    /// The code is consumed only when every check passes. Its deletion is the
    /// commit point: of two concurrent exchanges, only the one whose delete
    /// removes the entry receives tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthTokenResponse, DomainError> {
        let result = self
            .try_exchange_code(code, client_id, client_secret, redirect_uri)
            .await;

        if let Err(ref e) = result {
            warn!(client_id, kind = e.kind(), "Authorization code exchange failed");
            self.audit
                .record(
                    AuditEvent::new(AuditEventType::OAuthExchangeFailure, self.clock.now())
                        .with_client(client_id)
                        .with_failure(e.kind()),
                )
                .await;
        }
        result
    }

    async fn try_exchange_code(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthTokenResponse, DomainError> {
        let key = ledger_keys::oauth_code(code);
        let raw = self.ledger.get(&key).await?.ok_or(OAuthError::InvalidGrant)?;
        let grant: AuthorizationCode = serde_json::from_str(&raw)
            .map_err(|e| DomainError::internal(format!("Corrupt authorization code entry: {}", e)))?;

        let client = self.authenticate_client(client_id, client_secret).await?;

        if grant.client_id != client.client_id {
            debug!(client_id, "Code was issued to another client");
            return Err(OAuthError::InvalidGrant.into());
        }

        if redirect_uri != client.redirect_uri {
            return Err(OAuthError::RedirectMismatch.into());
        }

        if !self.ledger.delete(&key).await? {
            debug!(client_id, "Authorization code consumed concurrently");
            return Err(OAuthError::InvalidGrant.into());
        }

        let response = self
            .mint_pair(grant.user_id, &client.client_id, grant.scopes)
            .await?;

        info!(user_id = grant.user_id, client_id, "Authorization code exchanged");
        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthorizationCodeExchanged, self.clock.now())
                    .with_user(grant.user_id)
                    .with_client(client_id),
            )
            .await;

        Ok(response)
    }

    /// Refresh grant: replaces the presented refresh token with a new pair
    ///
    /// Every access token the user holds through this client is deleted first,
    /// so refreshing never accumulates live access tokens.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<OAuthTokenResponse, DomainError> {
        let now = self.clock.now();
        let stored = self
            .tokens
            .find_refresh_token(refresh_token, now)
            .await?
            .ok_or(OAuthError::InvalidGrant)?;

        let client = self.authenticate_client(client_id, client_secret).await?;
        if stored.client_id != client.client_id {
            debug!(client_id, "Refresh token belongs to another client");
            return Err(OAuthError::InvalidGrant.into());
        }

        if !self.tokens.delete_refresh_token(refresh_token).await? {
            return Err(OAuthError::InvalidGrant.into());
        }
        let removed = self
            .tokens
            .delete_access_tokens_for(stored.user_id, &client.client_id)
            .await?;

        let response = self
            .mint_pair(stored.user_id, &client.client_id, stored.scopes)
            .await?;

        info!(
            user_id = stored.user_id,
            client_id,
            access_tokens_removed = removed,
            "OAuth token refreshed"
        );
        self.audit
            .record(
                AuditEvent::new(AuditEventType::OAuthTokenRefreshed, now)
                    .with_user(stored.user_id)
                    .with_client(client_id),
            )
            .await;

        Ok(response)
    }

    /// Deletes a token from both tables; absent tokens are not an error
    pub async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        let removed = self.tokens.delete_token(token).await?;
        debug!(token = %mask_secret(token), removed, "OAuth token revoked");
        if removed > 0 {
            self.audit
                .record(AuditEvent::new(AuditEventType::OAuthTokenRevoked, self.clock.now()))
                .await;
        }
        Ok(())
    }

    /// Reports whether a bearer token is live, for resource servers
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, DomainError> {
        let now = self.clock.now();

        if let Some(access) = self.tokens.find_access_token(token, now).await? {
            return Ok(IntrospectionResponse::active(
                format_scopes(&access.scopes),
                access.client_id,
                access.user_id,
                access.expires_at.timestamp(),
            ));
        }

        if let Some(refresh) = self.tokens.find_refresh_token(token, now).await? {
            return Ok(IntrospectionResponse::active(
                format_scopes(&refresh.scopes),
                refresh.client_id,
                refresh.user_id,
                refresh.expires_at.timestamp(),
            ));
        }

        Ok(IntrospectionResponse::inactive())
    }

    /// Verifies client credentials; unknown id and wrong secret look the same
    async fn authenticate_client(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<OAuthClient, DomainError> {
        let Some(client) = self.clients.find_by_client_id(client_id).await? else {
            debug!(client_id, "Unknown OAuth client");
            return Err(OAuthError::InvalidClient.into());
        };

        if !bcrypt_verify(client_secret, &client.client_secret_hash).await? {
            debug!(client_id, "OAuth client secret mismatch");
            return Err(OAuthError::InvalidClient.into());
        }

        Ok(client)
    }

    async fn mint_pair(
        &self,
        user_id: UserId,
        client_id: &str,
        scopes: Vec<String>,
    ) -> Result<OAuthTokenResponse, DomainError> {
        let now = self.clock.now();
        let access = OAuthAccessToken {
            id: Uuid::new_v4(),
            user_id,
            client_id: client_id.to_string(),
            token: random_hex(TOKEN_BYTES),
            scopes: scopes.clone(),
            expires_at: now + Duration::seconds(self.config.access_token_ttl),
            created_at: now,
        };
        let refresh = OAuthRefreshToken {
            id: Uuid::new_v4(),
            user_id,
            client_id: client_id.to_string(),
            token: random_hex(TOKEN_BYTES),
            scopes,
            expires_at: now + Duration::seconds(self.config.refresh_token_ttl),
            created_at: now,
        };

        let response = OAuthTokenResponse::new(
            access.token.clone(),
            refresh.token.clone(),
            self.config.access_token_ttl,
            format_scopes(&access.scopes),
        );

        self.tokens.save_access_token(access).await?;
        self.tokens.save_refresh_token(refresh).await?;
        Ok(response)
    }
}
