//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{User, UserId, UserSnapshot};

/// Discriminates access tokens from refresh tokens signed with the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Registered claims every signed token carries
///
/// The codec uses these accessors to check expiry and not-before against
/// the injected clock after the signature has been verified.
pub trait RegisteredClaims {
    /// Expiration timestamp (seconds)
    fn expires_at(&self) -> i64;

    /// Not-before timestamp (seconds)
    fn not_before(&self) -> i64;

    /// Unique token identifier
    fn jti(&self) -> &str;

    /// Declared token type
    fn token_type(&self) -> TokenType;
}

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,

    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// JWT ID
    pub jti: String,

    /// Always [`TokenType::Access`]
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Embedded user snapshot
    pub user: UserSnapshot,
}

impl AccessClaims {
    /// Creates claims for an access token
    ///
    /// # Arguments
    ///
    /// * `issuer` - Issuer claim
    /// * `user` - The user the token is bound to
    /// * `jti` - Unique token identifier
    /// * `issued_at` - Issuing instant (seconds)
    /// * `ttl` - Lifetime in seconds
    pub fn new(issuer: &str, user: &User, jti: String, issued_at: i64, ttl: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user.id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl,
            nbf: issued_at,
            jti,
            token_type: TokenType::Access,
            user: user.snapshot(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// Seconds left before expiry, never negative
    pub fn remaining_lifetime(&self, now: i64) -> i64 {
        (self.exp - now).max(0)
    }
}

impl RegisteredClaims for AccessClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }

    fn not_before(&self) -> i64 {
        self.nbf
    }

    fn jti(&self) -> &str {
        &self.jti
    }

    fn token_type(&self) -> TokenType {
        self.token_type
    }
}

/// Claims of a long-lived refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl RefreshClaims {
    /// Creates claims for a refresh token
    pub fn new(issuer: &str, user_id: UserId, jti: String, issued_at: i64, ttl: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl,
            nbf: issued_at,
            jti,
            token_type: TokenType::Refresh,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

impl RegisteredClaims for RefreshClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }

    fn not_before(&self) -> i64 {
        self.nbf
    }

    fn jti(&self) -> &str {
        &self.jti
    }

    fn token_type(&self) -> TokenType {
        self.token_type
    }
}

/// Request context recorded alongside a refresh token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: Some(ip_address.into()),
            user_agent: Some(user_agent.into()),
        }
    }
}

/// Ledger entry stored under `refresh:<jti>` for the lifetime of a refresh token
///
/// The refresh token is only valid while this entry exists; deleting it is
/// how a refresh token is revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenMetadata {
    /// Owner of the token
    pub user_id: UserId,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Client IP at issuance
    pub ip_address: Option<String>,

    /// User agent at issuance
    pub user_agent: Option<String>,
}

impl RefreshTokenMetadata {
    pub fn new(user_id: UserId, created_at: DateTime<Utc>, context: &ClientContext) -> Self {
        Self {
            user_id,
            created_at,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
        }
    }
}
