//! Refresh grant, revocation and introspection

use crate::domain::value_objects::OAuthTokenResponse;
use crate::errors::{DomainError, OAuthError};

use super::{harness, scopes, Harness, CLIENT_ID, CLIENT_SECRET, REDIRECT_URI};

async fn exchange(h: &Harness) -> OAuthTokenResponse {
    let code = h
        .service
        .issue_authorization_code(42, CLIENT_ID, &scopes(&["bookings.view"]))
        .await
        .unwrap();
    h.service
        .exchange_code(&code, CLIENT_ID, CLIENT_SECRET, REDIRECT_URI)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_refresh_replaces_pair_and_prunes_access_tokens() {
    let h = harness().await;
    let first = exchange(&h).await;
    let _second = exchange(&h).await;
    assert_eq!(h.repo.access_token_count(42, CLIENT_ID).await, 2);

    let refreshed = h
        .service
        .refresh_access_token(&first.refresh_token, CLIENT_ID, CLIENT_SECRET)
        .await
        .unwrap();

    assert_eq!(refreshed.scope, "bookings.view");
    assert_ne!(refreshed.refresh_token, first.refresh_token);
    assert_eq!(h.repo.access_token_count(42, CLIENT_ID).await, 1);
    assert!(!h.service.introspect(&first.access_token).await.unwrap().active);
    assert!(h.service.introspect(&refreshed.access_token).await.unwrap().active);
}

#[tokio::test]
async fn test_used_refresh_token_is_invalid_grant() {
    let h = harness().await;
    let pair = exchange(&h).await;

    h.service
        .refresh_access_token(&pair.refresh_token, CLIENT_ID, CLIENT_SECRET)
        .await
        .unwrap();
    let err = h
        .service
        .refresh_access_token(&pair.refresh_token, CLIENT_ID, CLIENT_SECRET)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::OAuth(OAuthError::InvalidGrant)));
}

#[tokio::test]
async fn test_expired_refresh_token_is_invalid_grant() {
    let h = harness().await;
    let pair = exchange(&h).await;

    h.clock.advance(2592000);
    let err = h
        .service
        .refresh_access_token(&pair.refresh_token, CLIENT_ID, CLIENT_SECRET)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OAuth(OAuthError::InvalidGrant)));
}

#[tokio::test]
async fn test_refresh_requires_owning_client() {
    let h = harness().await;
    let pair = exchange(&h).await;

    let err = h
        .service
        .refresh_access_token(&pair.refresh_token, "other-app", "other-secret")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OAuth(OAuthError::InvalidGrant)));

    let err = h
        .service
        .refresh_access_token(&pair.refresh_token, CLIENT_ID, "bad-secret")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OAuth(OAuthError::InvalidClient)));

    // The token survives both failed attempts
    assert!(h
        .service
        .refresh_access_token(&pair.refresh_token, CLIENT_ID, CLIENT_SECRET)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_introspection() {
    let h = harness().await;
    let pair = exchange(&h).await;

    let info = h.service.introspect(&pair.access_token).await.unwrap();
    assert!(info.active);
    assert_eq!(info.user_id, Some(42));
    assert_eq!(info.client_id.as_deref(), Some(CLIENT_ID));
    assert_eq!(info.scope.as_deref(), Some("bookings.view"));
    assert_eq!(info.exp, Some(h.clock_timestamp() + 3600));

    h.clock.advance(3600);
    let info = h.service.introspect(&pair.access_token).await.unwrap();
    assert!(!info.active);
    assert_eq!(info.user_id, None);
}

#[tokio::test]
async fn test_revoke_deletes_from_both_tables_and_is_idempotent() {
    let h = harness().await;
    let pair = exchange(&h).await;

    h.service.revoke(&pair.access_token).await.unwrap();
    h.service.revoke(&pair.refresh_token).await.unwrap();
    h.service.revoke(&pair.refresh_token).await.unwrap();

    assert!(!h.service.introspect(&pair.access_token).await.unwrap().active);
    assert!(!h.service.introspect(&pair.refresh_token).await.unwrap().active);
    assert_eq!(h.repo.refresh_token_count().await, 0);
}

impl Harness {
    fn clock_timestamp(&self) -> i64 {
        use crate::clock::Clock;
        self.clock.timestamp()
    }
}
