//! Credential cleanup for periodic maintenance
//!
//! Deletes expired OAuth access and refresh tokens, and purges API keys that
//! expired longer ago than the retention period. Ledger entries expire by TTL
//! and need no sweep.

use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::errors::DomainError;
use crate::repositories::{ApiKeyRepository, OAuthTokenRepository};

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Days an expired API key is kept before deletion
    pub api_key_retention_days: i64,
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            api_key_retention_days: 30,
            enabled: true,
        }
    }
}

pub struct CredentialCleanupService<T, K>
where
    T: OAuthTokenRepository + 'static,
    K: ApiKeyRepository + 'static,
{
    oauth_tokens: Arc<T>,
    api_keys: Arc<K>,
    clock: Arc<dyn Clock>,
    config: CleanupConfig,
}

impl<T, K> CredentialCleanupService<T, K>
where
    T: OAuthTokenRepository + 'static,
    K: ApiKeyRepository + 'static,
{
    pub fn new(
        oauth_tokens: Arc<T>,
        api_keys: Arc<K>,
        clock: Arc<dyn Clock>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            oauth_tokens,
            api_keys,
            clock,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// A failing step is recorded in the result and does not stop the
    /// remaining steps.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting credential cleanup cycle");
        let now = self.clock.now();
        let mut result = CleanupResult::default();

        match self.oauth_tokens.delete_expired(now).await {
            Ok(count) => result.oauth_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup expired OAuth tokens: {}", e);
                result.errors.push(format!("OAuth token cleanup error: {}", e));
            }
        }

        let cutoff = now - Duration::days(self.config.api_key_retention_days);
        match self.api_keys.purge_expired_before(cutoff).await {
            Ok(count) => result.api_keys_purged = count,
            Err(e) => {
                error!("Failed to purge expired API keys: {}", e);
                result.errors.push(format!("API key purge error: {}", e));
            }
        }

        info!(
            "Credential cleanup completed - OAuth tokens: {}, API keys: {}",
            result.oauth_tokens_deleted, result.api_keys_purged
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Credential cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Credential cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Credential cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Expired OAuth access and refresh tokens deleted
    pub oauth_tokens_deleted: u64,
    /// API keys deleted after their retention period
    pub api_keys_purged: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> u64 {
        self.oauth_tokens_deleted + self.api_keys_purged
    }
}
