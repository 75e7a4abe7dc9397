//! Redis cache client implementation
//!
//! A multiplexed Redis connection with retry logic. Every key passes through
//! the configured prefix, so several deployments can share one Redis.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use rh_shared::mask::mask_key;

use crate::config::CacheConfig;
use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with retry logic
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the retry settings from the configuration
    ///
    /// # Example
    /// ```no_run
    /// use rh_infra::cache::RedisClient;
    /// use rh_infra::config::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, rh_infra::InfrastructureError> {
    ///     RedisClient::new(CacheConfig::new("redis://localhost:6379").with_prefix("renthub")).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            "Creating Redis client with URL: {} and prefix: {:?}",
            mask_url(&config.url),
            config.key_prefix
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Full key including the configured prefix
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// SET with EX
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.key(key);
        let value = value.to_string();
        debug!("Setting key '{}' with expiry {}s", mask_key(&key), expiry_seconds);

        self.execute_with_retry(&key, |mut conn, key| {
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.key(key);
        self.execute_with_retry(&key, |mut conn, key| {
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
    }

    /// DEL; true when a key was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        let removed: u32 = self
            .execute_with_retry(&key, |mut conn, key| {
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await?;
        Ok(removed > 0)
    }

    /// INCR; the counter keeps whatever expiry it already had
    pub async fn increment(&self, key: &str) -> Result<i64, InfrastructureError> {
        let key = self.key(key);
        let count = self
            .execute_with_retry(&key, |mut conn, key| {
                Box::pin(async move { conn.incr::<_, _, i64>(key, 1).await })
            })
            .await?;
        debug!("Counter '{}' incremented to {}", mask_key(&key), count);
        Ok(count)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        self.execute_with_retry(&key, |mut conn, key| {
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
    }

    /// Remaining TTL in seconds; `None` if the key is missing or has no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key = self.key(key);
        let ttl: i64 = self
            .execute_with_retry(&key, |mut conn, key| {
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response: String = self
            .execute_with_retry("PING", |mut conn, _| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Run an operation against `key`, retrying transient failures with
    /// exponential backoff
    async fn execute_with_retry<F, T>(&self, key: &str, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection, String) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn, key.to_string()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation on '{}' failed (attempt {}/{}): {}. Retrying in {}ms...",
                        mask_key(key), attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(
                        "Redis operation on '{}' failed after {} attempts: {}",
                        mask_key(key),
                        attempts,
                        e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }
}

/// Check if a Redis error is transient
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
