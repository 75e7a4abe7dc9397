//! In-memory ledger honouring TTLs against an injected clock

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::errors::DomainError;

use super::r#trait::LedgerStore;

struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Mock ledger for testing
///
/// Entries expire when the clock passes their TTL, so advancing a
/// `MockClock` makes codes, denylist entries and refresh metadata lapse.
#[derive(Clone)]
pub struct MockLedgerStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl MockLedgerStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live entries whose key starts with the prefix
    pub async fn count_prefix(&self, prefix: &str) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && Self::is_live(entry, now))
            .count()
    }

    /// Remaining TTL of a live entry in seconds
    pub async fn ttl(&self, key: &str) -> Option<i64> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|e| Self::is_live(e, now))?;
        entry.expires_at.map(|at| (at - now).num_seconds())
    }

    fn is_live(entry: &Entry, now: DateTime<Utc>) -> bool {
        entry.expires_at.map_or(true, |at| at > now)
    }
}

#[async_trait]
impl LedgerStore for MockLedgerStore {
    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), DomainError> {
        let expires_at = self.clock.now() + Duration::seconds(ttl_seconds as i64);
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| Self::is_live(e, now))
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let now = self.clock.now();
        let removed = self.entries.write().await.remove(key);
        Ok(matches!(removed, Some(entry) if Self::is_live(&entry, now)))
    }

    async fn increment(&self, key: &str) -> Result<i64, DomainError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        let current = match entries.get(key) {
            Some(entry) if Self::is_live(entry, now) => entry
                .value
                .parse::<i64>()
                .map_err(|_| DomainError::internal(format!("{} is not an integer", key)))?,
            _ => 0,
        };

        let next = current + 1;
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at: None,
            },
        );
        Ok(next)
    }
}
