//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management and the repository implementations backing
//! the relational credential store. The schema lives in
//! `infra/migrations/`.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlApiKeyRepository, MySqlOAuthRepository, MySqlRoleRepository, MySqlUserRepository,
};
