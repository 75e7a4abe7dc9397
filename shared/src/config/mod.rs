//! Configuration module with concern-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token lifetimes, signing secret, OAuth2, API keys and permission cache
//! - `cache` - Redis configuration for the ledger and permission cache
//! - `database` - Relational store connection and pool configuration
//! - `environment` - Environment detection
//! - `logging` - Log level and output format

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod logging;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{ApiKeyConfig, AuthConfig, JwtConfig, OAuthConfig, PermissionConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};

/// Prefix for environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "RH";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Baseline configuration for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            database: DatabaseConfig::for_environment(environment),
            cache: CacheConfig::default().with_prefix("renthub"),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            database: DatabaseConfig::from_env(environment),
            cache: CacheConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load layered configuration
    ///
    /// Layers, lowest precedence first:
    /// 1. Built-in defaults for the detected environment
    /// 2. `config.<environment>.toml` in the working directory (optional)
    /// 3. `RH__`-prefixed environment variables, `__` separating nested keys
    ///    (e.g. `RH__AUTH__JWT__SECRET`)
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let defaults = ::config::Config::try_from(&Self::for_environment(environment))
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::new(&environment.config_file(), ::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that are unsafe for the current environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()?;
        self.database.validate()?;

        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::Invalid(
                "the development JWT secret must not be used in production".to_string(),
            ));
        }

        Ok(())
    }
}
