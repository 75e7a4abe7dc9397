//! MySQL repository implementations

mod api_key_repository_impl;
mod oauth_repository_impl;
mod role_repository_impl;
mod user_repository_impl;

pub use api_key_repository_impl::MySqlApiKeyRepository;
pub use oauth_repository_impl::MySqlOAuthRepository;
pub use role_repository_impl::MySqlRoleRepository;
pub use user_repository_impl::MySqlUserRepository;

use rh_core::errors::DomainError;

/// MySQL error code for duplicate keys
const DUPLICATE_ENTRY: &str = "23000";

/// Maps a query failure to `DomainError::Internal` with context
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::internal(format!("{}: {}", context, e))
}

/// Like [`db_error`] but reports unique-key violations as validation errors
pub(crate) fn insert_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(DUPLICATE_ENTRY) => {
            DomainError::validation(format!("{}: duplicate entry", context))
        }
        _ => DomainError::internal(format!("{}: {}", context, e)),
    }
}
