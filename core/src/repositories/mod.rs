//! Storage seams for the identity subsystem.
//!
//! The relational credential store is reached through the repository traits,
//! and the TTL key-value ledger through [`LedgerStore`].

pub mod api_key;
pub mod ledger;
pub mod oauth;
pub mod role;
pub mod user;

pub use api_key::ApiKeyRepository;
pub use ledger::{keys as ledger_keys, LedgerStore};
pub use oauth::{OAuthClientRepository, OAuthTokenRepository};
pub use role::RoleRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use api_key::MockApiKeyRepository;
#[cfg(test)]
pub use ledger::MockLedgerStore;
#[cfg(test)]
pub use oauth::MockOAuthRepository;
#[cfg(test)]
pub use role::MockRoleRepository;
#[cfg(test)]
pub use user::MockUserRepository;
