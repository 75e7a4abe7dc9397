//! Integration tests for the Redis ledger against a live server

use std::sync::Arc;

use rh_core::repositories::{ledger_keys, LedgerStore};
use rh_shared::config::CacheConfig;

use crate::cache::{RedisClient, RedisLedger};

async fn ledger() -> Arc<dyn LedgerStore> {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let suffix: u32 = rand::random();
    let client = RedisClient::new(CacheConfig::new(url).with_prefix(format!("rh-ledger-{}", suffix)))
        .await
        .unwrap();
    Arc::new(RedisLedger::new(client))
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_single_use_delete() {
    let ledger = ledger().await;
    let key = ledger_keys::oauth_code("c0ffee");
    ledger.put(&key, "{}", 600).await.unwrap();

    let (first, second) = tokio::join!(ledger.delete(&key), ledger.delete(&key));
    let removed = [first.unwrap(), second.unwrap()];
    assert_eq!(removed.iter().filter(|r| **r).count(), 1);
    assert!(!ledger.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_entry_expires() {
    let ledger = ledger().await;
    let key = ledger_keys::blacklist("jti-1");
    ledger.put(&key, "1", 1).await.unwrap();
    assert!(ledger.exists(&key).await.unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert_eq!(ledger.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_increment_counts_from_zero() {
    let ledger = ledger().await;
    let key = ledger_keys::permission_version(9);
    assert_eq!(ledger.increment(&key).await.unwrap(), 1);
    assert_eq!(ledger.increment(&key).await.unwrap(), 2);
    ledger.delete(&key).await.unwrap();
}
