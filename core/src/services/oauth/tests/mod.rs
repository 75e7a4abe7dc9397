//! Tests for the OAuth2 exchange

use std::sync::Arc;

use rh_shared::config::OAuthConfig;

use crate::clock::MockClock;
use crate::domain::entities::oauth::OAuthClient;
use crate::repositories::{MockLedgerStore, MockOAuthRepository};
use crate::services::audit::{AuditService, AuditServiceConfig, MockAuditSink};

use super::OAuthService;

#[cfg(test)]
mod token_tests;

pub(super) const CLIENT_ID: &str = "listing-sync";
pub(super) const CLIENT_SECRET: &str = "s3cret-client-secret";
pub(super) const REDIRECT_URI: &str = "https://partner.example.com/oauth/callback";

pub(super) struct Harness {
    pub clock: Arc<MockClock>,
    pub ledger: MockLedgerStore,
    pub repo: Arc<MockOAuthRepository>,
    pub audit: MockAuditSink,
    pub service: OAuthService<MockOAuthRepository, MockOAuthRepository>,
}

pub(super) async fn harness() -> Harness {
    let clock = Arc::new(MockClock::new());
    let ledger = MockLedgerStore::new(clock.clone());
    let repo = Arc::new(MockOAuthRepository::new());

    let hash = bcrypt::hash(CLIENT_SECRET, 4).unwrap();
    repo.insert_client(OAuthClient::new(1, CLIENT_ID, hash, "Listing Sync", REDIRECT_URI))
        .await;
    let other_hash = bcrypt::hash("other-secret", 4).unwrap();
    repo.insert_client(OAuthClient::new(
        2,
        "other-app",
        other_hash,
        "Other",
        "https://other.example.com/cb",
    ))
    .await;

    let audit = MockAuditSink::new();
    let service = OAuthService::new(
        repo.clone(),
        repo.clone(),
        Arc::new(ledger.clone()),
        clock.clone(),
        AuditService::new(
            Arc::new(audit.clone()),
            AuditServiceConfig {
                async_writes: false,
            },
        ),
        OAuthConfig::default(),
    );

    Harness {
        clock,
        ledger,
        repo,
        audit,
        service,
    }
}

pub(super) fn scopes(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
