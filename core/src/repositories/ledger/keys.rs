//! Ledger key layout

use crate::domain::entities::UserId;

/// Refresh-token metadata, present while the refresh token is valid
pub fn refresh(jti: &str) -> String {
    format!("refresh:{}", jti)
}

/// Denylisted access-token id
pub fn blacklist(jti: &str) -> String {
    format!("blacklist:{}", jti)
}

/// Pending authorization code
pub fn oauth_code(code: &str) -> String {
    format!("oauth:code:{}", code)
}

/// Permission cache generation counter for a user
pub fn permission_version(user_id: UserId) -> String {
    format!("user:{}:perms:version", user_id)
}

/// Cached permission set for one generation
pub fn permissions(user_id: UserId, version: i64) -> String {
    format!("user:{}:perms:v{}", user_id, version)
}
