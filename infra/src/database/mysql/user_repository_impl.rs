//! MySQL implementation of the UserRepository trait.
//!
//! Users are owned by the marketplace; this adapter only reads the columns
//! the identity subsystem needs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use rh_core::domain::entities::user::{User, UserId};
use rh_core::errors::DomainError;
use rh_core::repositories::UserRepository;

use super::db_error;

const USER_COLUMNS: &str = "id, email, role, locked_until";

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: row.try_get("id").map_err(db_error("Failed to get id"))?,
            email: row.try_get("email").map_err(db_error("Failed to get email"))?,
            role: row.try_get("role").map_err(db_error("Failed to get role"))?,
            locked_until: row
                .try_get::<Option<DateTime<Utc>>, _>("locked_until")
                .map_err(db_error("Failed to get locked_until"))?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}
