//! MySQL implementation of the RoleRepository trait.
//!
//! Roles and their permissions are read with a single LEFT JOIN and folded
//! into [`Role`] values in query order.

use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use rh_core::domain::entities::permission::Role;
use rh_core::domain::entities::user::UserId;
use rh_core::errors::DomainError;
use rh_core::repositories::RoleRepository;

use super::{db_error, insert_error};

pub struct MySqlRoleRepository {
    pool: MySqlPool,
}

impl MySqlRoleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Folds `(role id, role name, permission?)` rows, ordered by role id
    fn fold_roles(rows: &[MySqlRow]) -> Result<Vec<Role>, DomainError> {
        let mut roles: Vec<Role> = Vec::new();
        for row in rows {
            let id: i64 = row.try_get("id").map_err(db_error("Failed to get role id"))?;
            let permission: Option<String> = row
                .try_get("permission")
                .map_err(db_error("Failed to get permission"))?;

            if roles.last().map(|r| r.id) != Some(id) {
                let name: String = row.try_get("name").map_err(db_error("Failed to get role name"))?;
                roles.push(Role::new(id, name, Vec::new()));
            }
            if let (Some(role), Some(permission)) = (roles.last_mut(), permission) {
                role.permissions.push(permission);
            }
        }
        Ok(roles)
    }

    async fn role_exists(&self, role_id: i64) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT id FROM roles WHERE id = ?")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find role"))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl RoleRepository for MySqlRoleRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.name, rp.permission
            FROM roles r
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            WHERE r.name = ?
            ORDER BY r.id, rp.permission
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to find role"))?;

        Ok(Self::fold_roles(&rows)?.into_iter().next())
    }

    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.name, rp.permission
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            WHERE ur.user_id = ?
            ORDER BY r.id, rp.permission
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load user roles"))?;

        Self::fold_roles(&rows)
    }

    async fn direct_permissions(&self, user_id: UserId) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query("SELECT permission FROM user_permissions WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load direct permissions"))?;

        rows.iter()
            .map(|row| row.try_get("permission").map_err(db_error("Failed to get permission")))
            .collect()
    }

    async fn members_of_role(&self, role_id: i64) -> Result<Vec<UserId>, DomainError> {
        let rows = sqlx::query("SELECT user_id FROM user_roles WHERE role_id = ?")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load role members"))?;

        rows.iter()
            .map(|row| row.try_get("user_id").map_err(db_error("Failed to get user_id")))
            .collect()
    }

    async fn assign_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError> {
        if !self.role_exists(role_id).await? {
            return Err(DomainError::not_found("role"));
        }

        let result = sqlx::query("INSERT IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(insert_error("Failed to assign role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_role(&self, user_id: UserId, role_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ? AND role_id = ?")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to remove role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn grant_permission(&self, user_id: UserId, permission: &str) -> Result<bool, DomainError> {
        let result =
            sqlx::query("INSERT IGNORE INTO user_permissions (user_id, permission) VALUES (?, ?)")
                .bind(user_id)
                .bind(permission)
                .execute(&self.pool)
                .await
                .map_err(insert_error("Failed to grant permission"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_permissions WHERE user_id = ? AND permission = ?")
            .bind(user_id)
            .bind(permission)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to revoke permission"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_permission_to_role(
        &self,
        role_id: i64,
        permission: &str,
    ) -> Result<bool, DomainError> {
        if !self.role_exists(role_id).await? {
            return Err(DomainError::not_found("role"));
        }

        let result =
            sqlx::query("INSERT IGNORE INTO role_permissions (role_id, permission) VALUES (?, ?)")
                .bind(role_id)
                .bind(permission)
                .execute(&self.pool)
                .await
                .map_err(insert_error("Failed to add permission to role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_permission_from_role(
        &self,
        role_id: i64,
        permission: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM role_permissions WHERE role_id = ? AND permission = ?")
            .bind(role_id)
            .bind(permission)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to remove permission from role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_role(&self, role_id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        for query in [
            "DELETE FROM user_roles WHERE role_id = ?",
            "DELETE FROM role_permissions WHERE role_id = ?",
        ] {
            sqlx::query(query)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete role assignments"))?;
        }

        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete role"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit role deletion"))?;

        Ok(result.rows_affected() > 0)
    }
}
