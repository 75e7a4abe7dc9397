//! OAuth2 client and opaque token repositories.

mod r#trait;
pub use r#trait::{OAuthClientRepository, OAuthTokenRepository};

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::MockOAuthRepository;
