//! Permission resolver
//!
//! The effective permission set of a user is the union of their direct
//! grants and the permissions of every role they hold. Sets are cached in the
//! ledger per user and invalidated after every mutation that can change them.

use std::sync::Arc;

use rh_shared::config::PermissionConfig;
use rh_shared::utils::validation::is_valid_permission;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::domain::entities::audit::{AuditEvent, AuditEventType};
use crate::domain::entities::permission::{PermissionSet, Role, RoleRef};
use crate::domain::entities::user::{User, UserId};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{LedgerStore, RoleRepository};
use crate::services::audit::AuditService;

use super::cache::PermissionCache;

pub struct PermissionResolver<R: RoleRepository> {
    roles: Arc<R>,
    cache: PermissionCache,
    clock: Arc<dyn Clock>,
    audit: AuditService,
    config: PermissionConfig,
}

impl<R: RoleRepository> PermissionResolver<R> {
    pub fn new(
        roles: Arc<R>,
        ledger: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        audit: AuditService,
        config: PermissionConfig,
    ) -> Self {
        Self {
            roles,
            cache: PermissionCache::new(ledger, config.cache_ttl),
            clock,
            audit,
            config,
        }
    }

    /// Effective permission set, read through the cache
    ///
    /// Concurrent misses each recompute the set; the last write wins within
    /// the same generation.
    pub async fn effective_permissions(&self, user_id: UserId) -> Result<PermissionSet, DomainError> {
        let version = self.cache.version(user_id).await?;
        if let Some(cached) = self.cache.get(user_id, version).await? {
            return Ok(cached);
        }

        let mut permissions: PermissionSet = self
            .roles
            .direct_permissions(user_id)
            .await?
            .into_iter()
            .collect();
        for role in self.roles.roles_for_user(user_id).await? {
            permissions.extend(role.permissions);
        }

        debug!(user_id, version, count = permissions.len(), "Permission set computed");
        self.cache.put(user_id, version, &permissions).await?;
        Ok(permissions)
    }

    pub async fn has_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError> {
        Ok(self.effective_permissions(user_id).await?.grants(permission))
    }

    pub async fn has_any_permission(
        &self,
        user_id: UserId,
        permissions: &[&str],
    ) -> Result<bool, DomainError> {
        let granted = self.effective_permissions(user_id).await?;
        Ok(permissions.iter().any(|p| granted.grants(p)))
    }

    /// True for an empty list
    pub async fn has_all_permissions(
        &self,
        user_id: UserId,
        permissions: &[&str],
    ) -> Result<bool, DomainError> {
        let granted = self.effective_permissions(user_id).await?;
        Ok(permissions.iter().all(|p| granted.grants(p)))
    }

    /// Whether the user holds a role through a role assignment
    pub async fn has_role(&self, user_id: UserId, role: &str) -> Result<bool, DomainError> {
        let roles = self.roles.roles_for_user(user_id).await?;
        Ok(roles.iter().any(|r| r.name == role))
    }

    /// Compares the user's role label against the rank table
    ///
    /// Unranked labels rank 0, so an unranked user passes only against
    /// another unranked role.
    pub fn has_role_or_higher(&self, user: &User, role: &str) -> bool {
        self.config.rank_of(&user.role) >= self.config.rank_of(role)
    }

    /// Fails with `Forbidden` unless the permission is granted
    pub async fn authorize(&self, user_id: UserId, permission: &str) -> Result<(), DomainError> {
        if self.has_permission(user_id, permission).await? {
            return Ok(());
        }

        info!(user_id, permission, "Permission denied");
        self.audit
            .record(
                AuditEvent::new(AuditEventType::PermissionDenied, self.clock.now())
                    .with_user(user_id)
                    .with_failure("Forbidden")
                    .with_metadata(serde_json::json!({ "permission": permission })),
            )
            .await;
        Err(AuthError::Forbidden.into())
    }

    pub async fn assign_role(
        &self,
        user_id: UserId,
        role: impl Into<RoleRef>,
    ) -> Result<bool, DomainError> {
        let role = self.resolve_role(role.into()).await?;
        let changed = self.roles.assign_role(user_id, role.id).await?;
        self.cache.invalidate(user_id).await?;

        if changed {
            info!(user_id, role = %role.name, "Role assigned");
            self.record_change(AuditEventType::RoleAssigned, user_id, "role", &role.name)
                .await;
        }
        Ok(changed)
    }

    pub async fn remove_role(
        &self,
        user_id: UserId,
        role: impl Into<RoleRef>,
    ) -> Result<bool, DomainError> {
        let role = self.resolve_role(role.into()).await?;
        let changed = self.roles.remove_role(user_id, role.id).await?;
        self.cache.invalidate(user_id).await?;

        if changed {
            info!(user_id, role = %role.name, "Role removed");
            self.record_change(AuditEventType::RoleRemoved, user_id, "role", &role.name)
                .await;
        }
        Ok(changed)
    }

    /// Grants a permission directly to a user
    pub async fn grant_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError> {
        validate_permission(permission)?;
        let changed = self.roles.grant_permission(user_id, permission).await?;
        self.cache.invalidate(user_id).await?;

        if changed {
            self.record_change(AuditEventType::PermissionGranted, user_id, "permission", permission)
                .await;
        }
        Ok(changed)
    }

    pub async fn revoke_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError> {
        validate_permission(permission)?;
        let changed = self.roles.revoke_permission(user_id, permission).await?;
        self.cache.invalidate(user_id).await?;

        if changed {
            self.record_change(AuditEventType::PermissionRevoked, user_id, "permission", permission)
                .await;
        }
        Ok(changed)
    }

    /// Adds a permission to a role and invalidates every member
    pub async fn grant_permission_to_role(
        &self,
        role: impl Into<RoleRef>,
        permission: &str,
    ) -> Result<bool, DomainError> {
        validate_permission(permission)?;
        let role = self.resolve_role(role.into()).await?;
        let changed = self.roles.add_permission_to_role(role.id, permission).await?;
        self.invalidate_members(role.id).await?;

        if changed {
            info!(role = %role.name, permission, "Permission added to role");
        }
        Ok(changed)
    }

    pub async fn revoke_permission_from_role(
        &self,
        role: impl Into<RoleRef>,
        permission: &str,
    ) -> Result<bool, DomainError> {
        validate_permission(permission)?;
        let role = self.resolve_role(role.into()).await?;
        let changed = self.roles.remove_permission_from_role(role.id, permission).await?;
        self.invalidate_members(role.id).await?;

        if changed {
            info!(role = %role.name, permission, "Permission removed from role");
        }
        Ok(changed)
    }

    /// Deletes a role; its former members are invalidated afterwards
    pub async fn delete_role(&self, role: impl Into<RoleRef>) -> Result<bool, DomainError> {
        let role = self.resolve_role(role.into()).await?;
        // Membership is gone once the role is deleted
        let members = self.roles.members_of_role(role.id).await?;
        let deleted = self.roles.delete_role(role.id).await?;

        for user_id in &members {
            self.cache.invalidate(*user_id).await?;
        }
        if deleted {
            info!(role = %role.name, members = members.len(), "Role deleted");
        }
        Ok(deleted)
    }

    /// Drops the cached set for one user
    pub async fn invalidate(&self, user_id: UserId) -> Result<(), DomainError> {
        self.cache.invalidate(user_id).await
    }

    async fn invalidate_members(&self, role_id: i64) -> Result<(), DomainError> {
        let members = self.roles.members_of_role(role_id).await?;
        debug!(role_id, members = members.len(), "Invalidating role members");
        for user_id in members {
            self.cache.invalidate(user_id).await?;
        }
        Ok(())
    }

    /// Loads a role by name, or takes a loaded record as-is
    async fn resolve_role(&self, role: RoleRef) -> Result<Role, DomainError> {
        match role {
            RoleRef::Role(role) => Ok(role),
            RoleRef::Name(name) => self
                .roles
                .find_role_by_name(&name)
                .await?
                .ok_or_else(|| DomainError::not_found("role")),
        }
    }

    async fn record_change(&self, event_type: AuditEventType, user_id: UserId, field: &str, value: &str) {
        self.audit
            .record(
                AuditEvent::new(event_type, self.clock.now())
                    .with_user(user_id)
                    .with_metadata(serde_json::json!({ field: value })),
            )
            .await;
    }
}

fn validate_permission(permission: &str) -> Result<(), DomainError> {
    if is_valid_permission(permission) {
        Ok(())
    } else {
        Err(DomainError::validation(format!("Invalid permission: {}", permission)))
    }
}
