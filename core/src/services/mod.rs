//! Business services containing the identity and access-control logic.

pub mod api_key;
pub mod audit;
pub mod cleanup;
pub mod oauth;
pub mod permission;
pub mod secrets;
pub mod token;

// Re-export commonly used types
pub use api_key::ApiKeyService;
pub use audit::{AuditService, AuditServiceConfig, AuditSink, NoOpAuditSink, TracingAuditSink};
pub use cleanup::{CleanupConfig, CleanupResult, CredentialCleanupService};
pub use oauth::OAuthService;
pub use permission::{PermissionCache, PermissionResolver};
pub use token::{extract_bearer, AccessTokenIssuer, RefreshTokenManager, TokenCodec, TokenService};
