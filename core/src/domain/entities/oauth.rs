//! OAuth2 client, authorization code and opaque token entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// A registered OAuth2 client application
///
/// Clients are registered out of band and are read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClient {
    /// Internal row identifier
    pub id: i64,

    /// Public client identifier presented at the token endpoint
    pub client_id: String,

    /// bcrypt hash of the client secret
    #[serde(skip_serializing)]
    pub client_secret_hash: String,

    /// Display name
    pub name: String,

    /// The only redirect URI accepted for this client
    pub redirect_uri: String,
}

impl OAuthClient {
    pub fn new(
        id: i64,
        client_id: impl Into<String>,
        client_secret_hash: impl Into<String>,
        name: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id,
            client_id: client_id.into(),
            client_secret_hash: client_secret_hash.into(),
            name: name.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

/// Ledger entry stored under `oauth:code:<code>` until exchanged or expired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Resource owner who approved the grant
    pub user_id: UserId,

    /// Public client identifier the code was issued to
    pub client_id: String,

    /// Granted scopes
    pub scopes: Vec<String>,

    /// Redirect URI the code was delivered to
    pub redirect_uri: String,

    pub created_at: DateTime<Utc>,
}

/// Persisted opaque access token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAccessToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub client_id: String,
    pub token: String,
    pub scopes: Vec<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OAuthAccessToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Persisted opaque refresh token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthRefreshToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub client_id: String,
    pub token: String,
    pub scopes: Vec<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OAuthRefreshToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Splits a space-delimited OAuth2 scope string (RFC 6749 section 3.3)
///
/// Duplicates are dropped; the first occurrence keeps its position.
pub fn parse_scopes(scope: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for s in scope.split_whitespace() {
        if !scopes.iter().any(|existing| existing == s) {
            scopes.push(s.to_string());
        }
    }
    scopes
}

/// Joins scopes into the space-delimited wire form
pub fn format_scopes(scopes: &[String]) -> String {
    scopes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_scopes() {
        assert_eq!(
            parse_scopes("  bookings.view  properties.* bookings.view "),
            vec!["bookings.view".to_string(), "properties.*".to_string()]
        );
        assert!(parse_scopes("").is_empty());
    }

    #[test]
    fn test_format_scopes() {
        let scopes = vec!["a.read".to_string(), "b.write".to_string()];
        assert_eq!(format_scopes(&scopes), "a.read b.write");
        assert_eq!(format_scopes(&[]), "");
    }

    #[test]
    fn test_secret_hash_not_serialized() {
        let client = OAuthClient::new(1, "client", "$2b$hash", "App", "https://app.example.com/cb");
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("client_secret_hash").is_none());
        assert_eq!(json["client_id"], "client");
    }

    #[test]
    fn test_token_expiry_boundary() {
        let now = Utc::now();
        let token = OAuthAccessToken {
            id: Uuid::new_v4(),
            user_id: 1,
            client_id: "client".to_string(),
            token: "abc".to_string(),
            scopes: vec![],
            expires_at: now,
            created_at: now - Duration::hours(1),
        };
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
    }
}
