//! Shared error response structures
//!
//! Every failure leaving the identity services is reduced to one of these
//! responses. The codes are deliberately coarse: a caller learns that it is
//! unauthenticated or forbidden, never which individual check failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }

    /// Uniform response for any authentication failure
    pub fn unauthenticated() -> Self {
        Self::new(error_codes::UNAUTHENTICATED, "Authentication required")
    }

    /// Uniform response for any authorization failure
    pub fn forbidden() -> Self {
        Self::new(error_codes::FORBIDDEN, "Access denied")
    }
}

/// Error codes used across the identity services
pub mod error_codes {
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

    /// RFC 6749 section 5.2 codes, returned verbatim by the token endpoint
    pub mod oauth {
        pub const INVALID_GRANT: &str = "invalid_grant";
        pub const INVALID_CLIENT: &str = "invalid_client";
        pub const INVALID_SCOPE: &str = "invalid_scope";
        pub const INVALID_REQUEST: &str = "invalid_request";
    }
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

/// Result type with ErrorResponse as error
pub type ApiResult<T> = Result<T, ErrorResponse>;
