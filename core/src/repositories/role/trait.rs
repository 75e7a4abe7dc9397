//! Role repository trait.
//!
//! Backs the many-to-many relations role-permission, user-role and
//! user-permission. Mutations return whether anything changed so callers can
//! skip cache invalidation for no-ops.

use async_trait::async_trait;

use crate::domain::entities::permission::Role;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find a role, with its permissions, by name
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;

    /// Roles assigned to a user, each with its permissions loaded
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError>;

    /// Permissions granted to a user directly
    async fn direct_permissions(&self, user_id: UserId) -> Result<Vec<String>, DomainError>;

    /// Users holding a role
    async fn members_of_role(&self, role_id: i64) -> Result<Vec<UserId>, DomainError>;

    async fn assign_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError>;

    async fn remove_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError>;

    async fn grant_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError>;

    async fn revoke_permission(&self, user_id: UserId, permission: &str)
        -> Result<bool, DomainError>;

    async fn add_permission_to_role(&self, role_id: i64, permission: &str)
        -> Result<bool, DomainError>;

    async fn remove_permission_from_role(
        &self,
        role_id: i64,
        permission: &str,
    ) -> Result<bool, DomainError>;

    /// Delete a role together with its assignments
    async fn delete_role(&self, role_id: i64) -> Result<bool, DomainError>;
}
