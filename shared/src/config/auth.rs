//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ConfigError;

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_ttl: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_ttl: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// Algorithm for JWT signing (only HS256 is accepted)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Clock skew tolerated when checking `exp`/`nbf`, in seconds
    #[serde(default)]
    pub leeway: i64,

    /// Issue a new refresh token on every refresh
    #[serde(default)]
    pub rotate_refresh_tokens: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_ttl: 900,      // 15 minutes
            refresh_token_ttl: 604800,  // 7 days
            issuer: String::from("renthub"),
            algorithm: default_algorithm(),
            leeway: 0,
            rotate_refresh_tokens: false,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token lifetime in seconds
    pub fn with_access_ttl(mut self, seconds: i64) -> Self {
        self.access_token_ttl = seconds;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_token_ttl = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// OAuth2 authorization server lifetimes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// Authorization code lifetime in seconds
    pub authorization_code_ttl: u64,

    /// Opaque access token lifetime in seconds
    pub access_token_ttl: i64,

    /// Opaque refresh token lifetime in seconds
    pub refresh_token_ttl: i64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorization_code_ttl: 600,  // 10 minutes
            access_token_ttl: 3600,       // 1 hour
            refresh_token_ttl: 2592000,   // 30 days
        }
    }
}

/// API key issuance configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiKeyConfig {
    /// Prefix prepended to every generated key
    pub prefix: String,

    /// Lifetime applied when the caller does not pass an expiry
    #[serde(default)]
    pub default_ttl_days: Option<i64>,

    /// How long expired keys are retained before the sweep deletes them
    pub retention_days: i64,
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self {
            prefix: String::from("rh_"),
            default_ttl_days: None,
            retention_days: 30,
        }
    }
}

/// Permission resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PermissionConfig {
    /// Lifetime of a cached effective permission set, in seconds
    pub cache_ttl: u64,

    /// Numeric rank of each role; roles missing here rank 0
    #[serde(default = "default_role_ranks")]
    pub role_ranks: HashMap<String, u32>,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            cache_ttl: 3600,
            role_ranks: default_role_ranks(),
        }
    }
}

impl PermissionConfig {
    /// Rank of a role label
    pub fn rank_of(&self, role: &str) -> u32 {
        self.role_ranks.get(role).copied().unwrap_or(0)
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// OAuth2 configuration
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// API key configuration
    #[serde(default)]
    pub api_keys: ApiKeyConfig,

    /// Permission resolver configuration
    #[serde(default)]
    pub permissions: PermissionConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt.secret),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", defaults.jwt.access_token_ttl),
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL", defaults.jwt.refresh_token_ttl),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
            rotate_refresh_tokens: env_or("ROTATE_REFRESH_TOKENS", false),
            ..defaults.jwt
        };

        let oauth = OAuthConfig {
            authorization_code_ttl: env_or(
                "OAUTH_CODE_TTL",
                defaults.oauth.authorization_code_ttl,
            ),
            access_token_ttl: env_or("OAUTH_ACCESS_TOKEN_TTL", defaults.oauth.access_token_ttl),
            refresh_token_ttl: env_or("OAUTH_REFRESH_TOKEN_TTL", defaults.oauth.refresh_token_ttl),
        };

        let api_keys = ApiKeyConfig {
            retention_days: env_or("API_KEY_RETENTION_DAYS", defaults.api_keys.retention_days),
            ..defaults.api_keys
        };

        let permissions = PermissionConfig {
            cache_ttl: env_or("PERMISSION_CACHE_TTL", defaults.permissions.cache_ttl),
            ..defaults.permissions
        };

        Self {
            jwt,
            oauth,
            api_keys,
            permissions,
        }
    }

    /// Check lifetimes and algorithm
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.algorithm != "HS256" {
            return Err(ConfigError::Invalid(format!(
                "unsupported JWT algorithm: {}",
                self.jwt.algorithm
            )));
        }
        if self.jwt.secret.len() < 16 {
            return Err(ConfigError::Invalid(
                "JWT secret must be at least 16 bytes".to_string(),
            ));
        }
        if self.jwt.access_token_ttl <= 0 || self.jwt.refresh_token_ttl <= 0 {
            return Err(ConfigError::Invalid(
                "token lifetimes must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_ttl <= self.jwt.access_token_ttl {
            return Err(ConfigError::Invalid(
                "refresh tokens must outlive access tokens".to_string(),
            ));
        }
        if self.oauth.authorization_code_ttl == 0 {
            return Err(ConfigError::Invalid(
                "authorization code lifetime must be positive".to_string(),
            ));
        }
        if self.api_keys.prefix.is_empty() {
            return Err(ConfigError::Invalid("API key prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_role_ranks() -> HashMap<String, u32> {
    [
        ("super_admin", 100),
        ("admin", 80),
        ("property_manager", 60),
        ("owner", 50),
        ("guest", 10),
    ]
    .into_iter()
    .map(|(role, rank)| (role.to_string(), rank))
    .collect()
}
