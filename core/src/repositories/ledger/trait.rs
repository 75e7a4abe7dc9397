//! Ledger store trait.
//!
//! The ledger holds refresh-token metadata, the access-token denylist,
//! pending authorization codes and cached permission sets. Each write carries
//! a TTL and entries vanish on their own once it elapses.

use async_trait::async_trait;

use crate::errors::DomainError;

/// TTL key-value store
///
/// Every operation must be atomic per key in the backing store.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Store a value, replacing any previous one, expiring after `ttl_seconds`
    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), DomainError>;

    /// Read a live value
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Delete a key
    ///
    /// # Returns
    /// * `Ok(true)` - A live entry was removed by this call
    /// * `Ok(false)` - Nothing to remove
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Check whether a live entry exists
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Atomically increment an integer counter without expiry
    ///
    /// A missing key counts as 0. Returns the new value.
    async fn increment(&self, key: &str) -> Result<i64, DomainError>;
}
