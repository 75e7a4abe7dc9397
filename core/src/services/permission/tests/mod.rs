//! Tests for the permission resolver

use std::sync::Arc;

use rh_shared::config::PermissionConfig;

use crate::clock::MockClock;
use crate::domain::entities::permission::Role;
use crate::repositories::{MockLedgerStore, MockRoleRepository};
use crate::services::audit::{AuditService, AuditServiceConfig, MockAuditSink};

use super::PermissionResolver;

#[cfg(test)]
mod resolver_tests;

pub(super) const ADMIN_ROLE: i64 = 1;
pub(super) const MANAGER_ROLE: i64 = 2;
pub(super) const GUEST_ROLE: i64 = 3;

pub(super) struct Harness {
    pub clock: Arc<MockClock>,
    pub ledger: MockLedgerStore,
    pub roles: Arc<MockRoleRepository>,
    pub audit: MockAuditSink,
    pub resolver: PermissionResolver<MockRoleRepository>,
}

pub(super) async fn harness() -> Harness {
    let clock = Arc::new(MockClock::new());
    let ledger = MockLedgerStore::new(clock.clone());
    let roles = Arc::new(MockRoleRepository::new());

    roles
        .insert_role(Role::new(ADMIN_ROLE, "admin", vec!["*".to_string()]))
        .await;
    roles
        .insert_role(Role::new(
            MANAGER_ROLE,
            "property_manager",
            vec!["properties.*".to_string(), "bookings.view".to_string()],
        ))
        .await;
    roles
        .insert_role(Role::new(GUEST_ROLE, "guest", vec!["bookings.create".to_string()]))
        .await;

    let audit = MockAuditSink::new();
    let resolver = PermissionResolver::new(
        roles.clone(),
        Arc::new(ledger.clone()),
        clock.clone(),
        AuditService::new(
            Arc::new(audit.clone()),
            AuditServiceConfig {
                async_writes: false,
            },
        ),
        PermissionConfig::default(),
    );

    Harness {
        clock,
        ledger,
        roles,
        audit,
        resolver,
    }
}
