//! Shared utilities and common types for the RentHub identity services
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types (JWT, OAuth2, API keys, permissions, cache, database, logging)
//! - Outward error response structure and error codes
//! - Validation utilities (permission strings, scopes, redirect URIs)
//! - Masking helpers for logging secrets

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    ApiKeyConfig, AppConfig, AuthConfig, CacheConfig, ConfigError, DatabaseConfig, Environment,
    JwtConfig, LoggingConfig, OAuthConfig, PermissionConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use utils::{mask, validation};
