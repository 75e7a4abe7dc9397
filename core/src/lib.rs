//! # RentHub Identity Core
//!
//! Business logic for identity and access control: the token codec, the
//! access/refresh token managers, the OAuth2 authorization-code exchange,
//! API-key issuance and the role/permission resolver.
//!
//! Storage is reached only through the traits in [`repositories`]; concrete
//! MySQL and Redis adapters live in the infrastructure crate.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, SystemClock};
pub use domain::entities::{
    ApiKey, AuditEvent, AuditEventType, OAuthClient, PermissionSet, Role, RoleRef, User, UserId,
};
pub use domain::value_objects::{ApiKeyCreated, IntrospectionResponse, OAuthTokenResponse, TokenPair};
pub use errors::{AuthError, DomainError, DomainResult, OAuthError, TokenError};
pub use repositories::{
    ApiKeyRepository, LedgerStore, OAuthClientRepository, OAuthTokenRepository, RoleRepository,
    UserRepository,
};
pub use services::{
    ApiKeyService, AuditService, CredentialCleanupService, OAuthService, PermissionResolver,
    TokenService,
};
