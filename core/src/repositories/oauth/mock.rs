//! Mock implementation of the OAuth2 repositories for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::oauth::{OAuthAccessToken, OAuthClient, OAuthRefreshToken};
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

use super::r#trait::{OAuthClientRepository, OAuthTokenRepository};

/// In-memory clients and token tables
#[derive(Clone, Default)]
pub struct MockOAuthRepository {
    clients: Arc<RwLock<HashMap<String, OAuthClient>>>,
    access_tokens: Arc<RwLock<HashMap<String, OAuthAccessToken>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, OAuthRefreshToken>>>,
}

impl MockOAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client
    pub async fn insert_client(&self, client: OAuthClient) {
        self.clients
            .write()
            .await
            .insert(client.client_id.clone(), client);
    }

    /// Access token rows held for a user and client, expired ones included
    pub async fn access_token_count(&self, user_id: UserId, client_id: &str) -> usize {
        self.access_tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id && t.client_id == client_id)
            .count()
    }

    pub async fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.read().await.len()
    }
}

#[async_trait]
impl OAuthClientRepository for MockOAuthRepository {
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<OAuthClient>, DomainError> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }
}

#[async_trait]
impl OAuthTokenRepository for MockOAuthRepository {
    async fn save_access_token(&self, token: OAuthAccessToken) -> Result<(), DomainError> {
        let mut tokens = self.access_tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(DomainError::validation("Token already exists"));
        }
        tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn save_refresh_token(&self, token: OAuthRefreshToken) -> Result<(), DomainError> {
        let mut tokens = self.refresh_tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(DomainError::validation("Token already exists"));
        }
        tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn find_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthAccessToken>, DomainError> {
        let tokens = self.access_tokens.read().await;
        Ok(tokens.get(token).filter(|t| !t.is_expired_at(now)).cloned())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OAuthRefreshToken>, DomainError> {
        let tokens = self.refresh_tokens.read().await;
        Ok(tokens.get(token).filter(|t| !t.is_expired_at(now)).cloned())
    }

    async fn delete_access_tokens_for(
        &self,
        user_id: UserId,
        client_id: &str,
    ) -> Result<u64, DomainError> {
        let mut tokens = self.access_tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !(t.user_id == user_id && t.client_id == client_id));
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.refresh_tokens.write().await.remove(token).is_some())
    }

    async fn delete_token(&self, token: &str) -> Result<u64, DomainError> {
        let access = self.access_tokens.write().await.remove(token).is_some() as u64;
        let refresh = self.refresh_tokens.write().await.remove(token).is_some() as u64;
        Ok(access + refresh)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut access = self.access_tokens.write().await;
        let mut refresh = self.refresh_tokens.write().await;
        let before = access.len() + refresh.len();

        access.retain(|_, t| !t.is_expired_at(now));
        refresh.retain(|_, t| !t.is_expired_at(now));

        Ok((before - access.len() - refresh.len()) as u64)
    }
}
