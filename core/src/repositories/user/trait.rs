//! User repository trait.
//!
//! Users are owned by the credential store; this subsystem only reads them.

use async_trait::async_trait;

use crate::domain::entities::user::{User, UserId};
use crate::errors::DomainError;

/// Read access to registered users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Storage error
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
