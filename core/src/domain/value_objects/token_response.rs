//! Token response value objects returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserId;

/// Token type advertised in every token response
pub const BEARER: &str = "Bearer";

/// Access and refresh token pair issued at login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
            expires_in,
        }
    }
}

/// Token endpoint response for both the code and refresh grants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,

    /// Space-delimited granted scopes
    pub scope: String,
}

impl OAuthTokenResponse {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64, scope: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
            expires_in,
            scope,
        }
    }
}

/// RFC 7662 style introspection result
///
/// An inactive token serializes to `{"active": false}` only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntrospectionResponse {
    pub active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Expiry as a Unix timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl IntrospectionResponse {
    pub fn active(scope: String, client_id: String, user_id: UserId, exp: i64) -> Self {
        Self {
            active: true,
            scope: Some(scope),
            client_id: Some(client_id),
            user_id: Some(user_id),
            exp: Some(exp),
        }
    }

    pub fn inactive() -> Self {
        Self {
            active: false,
            scope: None,
            client_id: None,
            user_id: None,
            exp: None,
        }
    }
}

/// API key creation response; the only time the plaintext key is revealed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyCreated {
    pub id: uuid::Uuid,
    pub key: String,
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
}
