//! Domain entities representing core business objects.

pub mod api_key;
pub mod audit;
pub mod oauth;
pub mod permission;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use api_key::ApiKey;
pub use audit::{AuditEvent, AuditEventType};
pub use oauth::{
    format_scopes, parse_scopes, AuthorizationCode, OAuthAccessToken, OAuthClient,
    OAuthRefreshToken,
};
pub use permission::{wildcard_matches, PermissionSet, Role, RoleRef, WILDCARD};
pub use token::{
    AccessClaims, ClientContext, RefreshClaims, RefreshTokenMetadata, RegisteredClaims, TokenType,
};
pub use user::{User, UserId, UserSnapshot};
