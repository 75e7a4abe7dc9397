//! Mock implementation of RoleRepository for testing

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::permission::Role;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

use super::r#trait::RoleRepository;

#[derive(Default)]
struct Tables {
    roles: HashMap<i64, Role>,
    user_roles: HashMap<UserId, BTreeSet<i64>>,
    user_permissions: HashMap<UserId, BTreeSet<String>>,
}

/// In-memory role tables
///
/// Counts permission loads so tests can observe cache hits.
#[derive(Clone, Default)]
pub struct MockRoleRepository {
    tables: Arc<RwLock<Tables>>,
    loads: Arc<AtomicUsize>,
}

impl MockRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role
    pub async fn insert_role(&self, role: Role) {
        self.tables.write().await.roles.insert(role.id, role);
    }

    /// Number of `roles_for_user` calls served
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        let Some(role_ids) = tables.user_roles.get(&user_id) else {
            return Ok(Vec::new());
        };
        Ok(role_ids
            .iter()
            .filter_map(|id| tables.roles.get(id).cloned())
            .collect())
    }

    async fn direct_permissions(&self, user_id: UserId) -> Result<Vec<String>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_permissions
            .get(&user_id)
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn members_of_role(&self, role_id: i64) -> Result<Vec<UserId>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_roles
            .iter()
            .filter(|(_, roles)| roles.contains(&role_id))
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn assign_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) {
            return Err(DomainError::not_found("role"));
        }
        Ok(tables.user_roles.entry(user_id).or_default().insert(role_id))
    }

    async fn remove_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .user_roles
            .get_mut(&user_id)
            .map_or(false, |roles| roles.remove(&role_id)))
    }

    async fn grant_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .user_permissions
            .entry(user_id)
            .or_default()
            .insert(permission.to_string()))
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &str,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .user_permissions
            .get_mut(&user_id)
            .map_or(false, |p| p.remove(permission)))
    }

    async fn add_permission_to_role(
        &self,
        role_id: i64,
        permission: &str,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let role = tables
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| DomainError::not_found("role"))?;
        if role.permissions.iter().any(|p| p == permission) {
            return Ok(false);
        }
        role.permissions.push(permission.to_string());
        Ok(true)
    }

    async fn remove_permission_from_role(
        &self,
        role_id: i64,
        permission: &str,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(role) = tables.roles.get_mut(&role_id) else {
            return Ok(false);
        };
        let before = role.permissions.len();
        role.permissions.retain(|p| p != permission);
        Ok(role.permissions.len() != before)
    }

    async fn delete_role(&self, role_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let removed = tables.roles.remove(&role_id).is_some();
        for roles in tables.user_roles.values_mut() {
            roles.remove(&role_id);
        }
        Ok(removed)
    }
}
