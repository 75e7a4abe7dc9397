//! # Infrastructure Layer
//!
//! Concrete adapters for the identity subsystem:
//! - **Database**: MySQL repositories for users, OAuth clients and tokens,
//!   API keys and roles, using SQLx
//! - **Cache**: Redis client and the Redis-backed token ledger
//! - **Bootstrap**: wiring of configuration, adapters and services
//! - **Telemetry**: tracing subscriber initialisation

use rh_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and ledger
pub mod cache;

/// Service container and startup wiring
pub mod bootstrap;

/// Tracing subscriber setup
pub mod telemetry;

/// Configuration module for infrastructure services
pub mod config {
    pub use rh_shared::config::{AppConfig, CacheConfig, DatabaseConfig, LoggingConfig};
}

pub use bootstrap::IdentityServices;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::internal(err.to_string())
    }
}

impl From<rh_shared::config::ConfigError> for InfrastructureError {
    fn from(err: rh_shared::config::ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_error_maps_to_internal() {
        let err: DomainError = InfrastructureError::Config("missing url".to_string()).into();
        assert!(matches!(err, DomainError::Internal { ref message } if message.contains("missing url")));
    }
}
