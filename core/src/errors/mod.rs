//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, OAuthError, TokenError};

use rh_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    OAuth(#[from] OAuthError),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// The coarse category a caller is allowed to learn about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outward {
    Unauthenticated,
    Forbidden,
    InvalidRequest,
    Internal,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Reduces the error to what may be shown to a caller
    ///
    /// Lookup misses and every credential failure collapse into
    /// `Unauthenticated`, so "unknown user" and "bad token" look identical.
    pub fn outward(&self) -> Outward {
        match self {
            DomainError::Validation { .. } => Outward::InvalidRequest,
            DomainError::NotFound { .. } => Outward::Unauthenticated,
            DomainError::Internal { .. } => Outward::Internal,
            DomainError::Auth(AuthError::Forbidden) => Outward::Forbidden,
            DomainError::Auth(_) => Outward::Unauthenticated,
            DomainError::Token(TokenError::SigningFailed) => Outward::Internal,
            DomainError::Token(_) => Outward::Unauthenticated,
            DomainError::OAuth(OAuthError::InvalidScope { .. }) => Outward::InvalidRequest,
            DomainError::OAuth(_) => Outward::Unauthenticated,
        }
    }

    /// Precise failure kind for logs
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "Validation",
            DomainError::NotFound { .. } => "NotFound",
            DomainError::Internal { .. } => "Internal",
            DomainError::Auth(AuthError::NotFound) => "NotFound",
            DomainError::Auth(AuthError::Forbidden) => "Forbidden",
            DomainError::Auth(AuthError::Unauthenticated) => "Unauthenticated",
            DomainError::Auth(AuthError::AccountLocked) => "AccountLocked",
            DomainError::Token(err) => err.kind(),
            DomainError::OAuth(err) => err.kind(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        // Token endpoint errors use the RFC 6749 codes
        if let DomainError::OAuth(err) = self {
            return match err {
                OAuthError::InvalidClient => ErrorResponse::new(
                    error_codes::oauth::INVALID_CLIENT,
                    "Client authentication failed",
                ),
                OAuthError::InvalidScope { .. } => ErrorResponse::new(
                    error_codes::oauth::INVALID_SCOPE,
                    "The requested scope is invalid",
                ),
                OAuthError::InvalidGrant | OAuthError::RedirectMismatch => ErrorResponse::new(
                    error_codes::oauth::INVALID_GRANT,
                    "The provided authorization grant is invalid",
                ),
            };
        }

        match self.outward() {
            Outward::Unauthenticated => ErrorResponse::unauthenticated(),
            Outward::Forbidden => ErrorResponse::forbidden(),
            Outward::InvalidRequest => {
                ErrorResponse::new(error_codes::INVALID_REQUEST, self.to_string())
            }
            Outward::Internal => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}
