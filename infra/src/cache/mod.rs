//! Cache module for Redis-based state
//!
//! Provides the Redis client and the ledger holding refresh-token metadata,
//! the access-token denylist, authorization codes and cached permissions.

pub mod redis_client;
pub mod redis_ledger;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_ledger::RedisLedger;

// Re-export commonly used types
pub use rh_shared::config::CacheConfig;
