//! Tests for the token service

use std::sync::Arc;

use chrono::{DateTime, Utc};

use rh_shared::config::JwtConfig;

use crate::clock::{Clock, MockClock};
use crate::domain::entities::user::User;
use crate::repositories::{MockLedgerStore, MockUserRepository};
use crate::services::audit::{AuditService, AuditServiceConfig, MockAuditSink};

use super::TokenService;


pub(super) const SECRET: &str = "test-secret-key-for-unit-tests-only";

pub(super) struct Harness {
    pub clock: Arc<MockClock>,
    pub ledger: MockLedgerStore,
    pub users: Arc<MockUserRepository>,
    pub audit: MockAuditSink,
    pub service: TokenService<MockUserRepository>,
}

impl Harness {
    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub(super) async fn harness_with(config: JwtConfig) -> Harness {
    let clock = Arc::new(MockClock::new());
    let ledger = MockLedgerStore::new(clock.clone());
    let users = Arc::new(MockUserRepository::new());
    users.insert(tenant()).await;

    let audit = MockAuditSink::new();
    let audit_service = AuditService::new(
        Arc::new(audit.clone()),
        AuditServiceConfig {
            async_writes: false,
        },
    );

    let service = TokenService::new(
        &config,
        Arc::new(ledger.clone()),
        users.clone(),
        clock.clone(),
        audit_service,
    )
    .unwrap();

    Harness {
        clock,
        ledger,
        users,
        audit,
        service,
    }
}

pub(super) async fn harness() -> Harness {
    harness_with(JwtConfig::new(SECRET)).await
}

pub(super) fn tenant() -> User {
    User::new(42, "tenant@example.com", "guest")
}
