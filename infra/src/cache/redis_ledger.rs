//! Redis-backed [`LedgerStore`]
//!
//! Each ledger operation maps onto a single Redis command, so atomicity per
//! key comes from Redis itself.

use async_trait::async_trait;

use rh_core::errors::DomainError;
use rh_core::repositories::LedgerStore;

use super::redis_client::RedisClient;

#[derive(Clone)]
pub struct RedisLedger {
    client: RedisClient,
}

impl RedisLedger {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LedgerStore for RedisLedger {
    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), DomainError> {
        // SET EX rejects a zero expiry
        Ok(self
            .client
            .set_with_expiry(key, value, ttl_seconds.max(1))
            .await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(key).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.client.delete(key).await?)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(key).await?)
    }

    async fn increment(&self, key: &str) -> Result<i64, DomainError> {
        Ok(self.client.increment(key).await?)
    }
}
