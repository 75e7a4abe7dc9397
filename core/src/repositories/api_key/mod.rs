//! API key repository module.

mod r#trait;
pub use r#trait::ApiKeyRepository;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::MockApiKeyRepository;
