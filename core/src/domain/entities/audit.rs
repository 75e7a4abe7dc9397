//! Audit event entity for recording authentication and authorization decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::user::UserId;

/// Security-relevant event kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    // Session events
    LoginSuccess,
    LoginFailure,
    Logout,

    // JWT events
    TokenRefreshed,
    TokenRevoked,
    TokenValidationFailure,

    // OAuth2 events
    AuthorizationCodeIssued,
    AuthorizationCodeExchanged,
    OAuthTokenRefreshed,
    OAuthTokenRevoked,
    OAuthExchangeFailure,

    // API key events
    ApiKeyCreated,
    ApiKeyRevoked,
    ApiKeyRotated,
    ApiKeyRejected,

    // Authorization events
    PermissionDenied,
    RoleAssigned,
    RoleRemoved,
    PermissionGranted,
    PermissionRevoked,
}

impl AuditEventType {
    /// Convert to string representation for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailure => "LOGIN_FAILURE",
            Self::Logout => "LOGOUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::TokenValidationFailure => "TOKEN_VALIDATION_FAILURE",
            Self::AuthorizationCodeIssued => "AUTHORIZATION_CODE_ISSUED",
            Self::AuthorizationCodeExchanged => "AUTHORIZATION_CODE_EXCHANGED",
            Self::OAuthTokenRefreshed => "OAUTH_TOKEN_REFRESHED",
            Self::OAuthTokenRevoked => "OAUTH_TOKEN_REVOKED",
            Self::OAuthExchangeFailure => "OAUTH_EXCHANGE_FAILURE",
            Self::ApiKeyCreated => "API_KEY_CREATED",
            Self::ApiKeyRevoked => "API_KEY_REVOKED",
            Self::ApiKeyRotated => "API_KEY_ROTATED",
            Self::ApiKeyRejected => "API_KEY_REJECTED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::RoleAssigned => "ROLE_ASSIGNED",
            Self::RoleRemoved => "ROLE_REMOVED",
            Self::PermissionGranted => "PERMISSION_GRANTED",
            Self::PermissionRevoked => "PERMISSION_REVOKED",
        }
    }

    /// Whether the event records a rejected attempt
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::LoginFailure
                | Self::TokenValidationFailure
                | Self::OAuthExchangeFailure
                | Self::ApiKeyRejected
                | Self::PermissionDenied
        )
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit record handed to an audit sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEvent {
    pub event_type: AuditEventType,

    /// Acting or affected user, if known
    pub user_id: Option<UserId>,

    /// OAuth2 client, if the event came through the exchange
    pub client_id: Option<String>,

    /// Failure kind kept for diagnosis; never returned to callers
    pub failure_reason: Option<String>,

    /// Additional event data
    pub metadata: Option<JsonValue>,

    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_type,
            user_id: None,
            client_id: None,
            failure_reason: None,
            metadata: None,
            occurred_at,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_failure(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
