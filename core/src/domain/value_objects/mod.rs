//! Value objects representing immutable domain concepts.

pub mod token_response;

// Re-export commonly used types
pub use token_response::{
    ApiKeyCreated, IntrospectionResponse, OAuthTokenResponse, TokenPair, BEARER,
};
