//! Token service module for JWT management
//!
//! This module handles all signed-token operations:
//! - Signing and verification against an injected clock
//! - Access token issuance and the access-token denylist
//! - Refresh token issuance, validation, revocation and rotation
//! - The login/authenticate/refresh/logout facade

mod access;
mod codec;
mod refresh;
mod service;

#[cfg(test)]
mod tests;

pub use access::AccessTokenIssuer;
pub use codec::TokenCodec;
pub use refresh::RefreshTokenManager;
pub use service::{extract_bearer, TokenService};
