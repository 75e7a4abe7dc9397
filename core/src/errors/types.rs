//! Error kinds for token verification, the OAuth2 exchange and authorization
//!
//! The variants keep the precise failure for logging. What a caller sees is
//! decided by [`super::DomainError::outward`].

use thiserror::Error;

/// Token codec and token lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Malformed token")]
    Malformed,

    #[error("Unexpected token type: expected {expected}")]
    WrongType { expected: String },

    #[error("Token revoked")]
    Revoked,

    #[error("Token signing failed")]
    SigningFailed,
}

impl TokenError {
    /// Short name for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "InvalidSignature",
            Self::Expired => "Expired",
            Self::NotYetValid => "NotYetValid",
            Self::Malformed => "Malformed",
            Self::WrongType { .. } => "WrongType",
            Self::Revoked => "Revoked",
            Self::SigningFailed => "SigningFailed",
        }
    }
}

/// OAuth2 authorization-code and refresh grant errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// Code or refresh token unknown, expired or already consumed
    #[error("Invalid grant")]
    InvalidGrant,

    /// Unknown client id or secret mismatch
    #[error("Invalid client")]
    InvalidClient,

    #[error("Redirect URI mismatch")]
    RedirectMismatch,

    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },
}

impl OAuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidGrant => "InvalidGrant",
            Self::InvalidClient => "InvalidClient",
            Self::RedirectMismatch => "RedirectMismatch",
            Self::InvalidScope { .. } => "InvalidScope",
        }
    }
}

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    NotFound,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Account locked")]
    AccountLocked,
}
