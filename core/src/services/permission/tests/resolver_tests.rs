//! Unit tests for permission resolution, role ranks and mutations

use crate::domain::entities::audit::AuditEventType;
use crate::domain::entities::permission::{Role, RoleRef};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::RoleRepository;

use super::{harness, GUEST_ROLE, MANAGER_ROLE};

#[tokio::test]
async fn test_effective_set_is_union_of_roles_and_direct_grants() {
    let h = harness().await;
    h.resolver.assign_role(7, "property_manager").await.unwrap();
    h.resolver.assign_role(7, "guest").await.unwrap();
    h.resolver.grant_permission(7, "messages.send").await.unwrap();

    let permissions = h.resolver.effective_permissions(7).await.unwrap();
    let mut listed: Vec<&str> = permissions.iter().map(String::as_str).collect();
    listed.sort();
    assert_eq!(
        listed,
        vec!["bookings.create", "bookings.view", "messages.send", "properties.*"]
    );
}

#[tokio::test]
async fn test_duplicate_grants_are_deduplicated() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();
    h.resolver.grant_permission(7, "bookings.create").await.unwrap();

    let permissions = h.resolver.effective_permissions(7).await.unwrap();
    assert_eq!(permissions.len(), 1);
}

#[tokio::test]
async fn test_wildcard_resolution() {
    let h = harness().await;
    h.resolver.assign_role(7, "property_manager").await.unwrap();

    assert!(h.resolver.has_permission(7, "properties.edit.own").await.unwrap());
    assert!(h.resolver.has_permission(7, "properties.delete").await.unwrap());
    assert!(h.resolver.has_permission(7, "bookings.view").await.unwrap());
    assert!(!h.resolver.has_permission(7, "bookings.cancel").await.unwrap());
    assert!(!h.resolver.has_permission(7, "propertiesx.edit").await.unwrap());
}

#[tokio::test]
async fn test_superuser_wildcard_grants_everything() {
    let h = harness().await;
    h.resolver.assign_role(1, "admin").await.unwrap();
    assert!(h.resolver.has_permission(1, "anything.at.all").await.unwrap());
}

#[tokio::test]
async fn test_user_without_grants_has_nothing() {
    let h = harness().await;
    assert!(h.resolver.effective_permissions(99).await.unwrap().is_empty());
    assert!(!h.resolver.has_permission(99, "bookings.view").await.unwrap());
}

#[tokio::test]
async fn test_any_and_all() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();

    assert!(h
        .resolver
        .has_any_permission(7, &["properties.edit", "bookings.create"])
        .await
        .unwrap());
    assert!(!h
        .resolver
        .has_all_permissions(7, &["properties.edit", "bookings.create"])
        .await
        .unwrap());
    assert!(h.resolver.has_all_permissions(7, &[]).await.unwrap());
    assert!(!h.resolver.has_any_permission(7, &[]).await.unwrap());
}

#[tokio::test]
async fn test_has_role() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();
    assert!(h.resolver.has_role(7, "guest").await.unwrap());
    assert!(!h.resolver.has_role(7, "admin").await.unwrap());
}

#[tokio::test]
async fn test_role_rank_ordering() {
    let h = harness().await;
    let admin = User::new(1, "admin@renthub.test", "admin");
    let manager = User::new(2, "pm@renthub.test", "property_manager");
    let stranger = User::new(3, "x@renthub.test", "contractor");

    assert!(h.resolver.has_role_or_higher(&admin, "property_manager"));
    assert!(!h.resolver.has_role_or_higher(&manager, "admin"));
    assert!(h.resolver.has_role_or_higher(&manager, "owner"));
    assert!(h.resolver.has_role_or_higher(&manager, "property_manager"));
    assert!(!h.resolver.has_role_or_higher(&stranger, "guest"));
    assert!(h.resolver.has_role_or_higher(&stranger, "unknown_role"));
}

#[tokio::test]
async fn test_authorize_denies_and_audits() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();

    assert!(h.resolver.authorize(7, "bookings.create").await.is_ok());
    let err = h.resolver.authorize(7, "properties.delete").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::Forbidden)));
    assert_eq!(
        h.audit.event_types().last(),
        Some(&AuditEventType::PermissionDenied)
    );
}

#[tokio::test]
async fn test_unknown_role_name_is_not_found() {
    let h = harness().await;
    let err = h.resolver.assign_role(7, "landlord").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_loaded_role_reference_is_used_directly() {
    let h = harness().await;
    let guest = h.roles.find_role_by_name("guest").await.unwrap().unwrap();
    assert!(h.resolver.assign_role(7, RoleRef::Role(guest)).await.unwrap());
    assert!(h.resolver.has_permission(7, "bookings.create").await.unwrap());
}

#[tokio::test]
async fn test_repeated_assignment_reports_no_change() {
    let h = harness().await;
    assert!(h.resolver.assign_role(7, "guest").await.unwrap());
    assert!(!h.resolver.assign_role(7, "guest").await.unwrap());

    let assigned = h
        .audit
        .event_types()
        .into_iter()
        .filter(|t| *t == AuditEventType::RoleAssigned)
        .count();
    assert_eq!(assigned, 1);
}

#[tokio::test]
async fn test_invalid_permission_strings_rejected() {
    let h = harness().await;
    for bad in ["", "Properties.Edit", "properties.*.edit", "properties."] {
        let err = h.resolver.grant_permission(7, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }), "{bad}");
    }
    let err = h
        .resolver
        .grant_permission_to_role("guest", "bad perm")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn test_removing_role_drops_its_permissions() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();
    assert!(h.resolver.has_permission(7, "bookings.create").await.unwrap());

    assert!(h.resolver.remove_role(7, "guest").await.unwrap());
    assert!(!h.resolver.has_permission(7, "bookings.create").await.unwrap());
}

#[tokio::test]
async fn test_role_permission_change_reaches_every_member() {
    let h = harness().await;
    h.resolver.assign_role(7, "guest").await.unwrap();
    h.resolver.assign_role(8, "guest").await.unwrap();
    h.resolver.assign_role(9, "property_manager").await.unwrap();
    for user in [7, 8, 9] {
        h.resolver.effective_permissions(user).await.unwrap();
    }

    h.resolver
        .grant_permission_to_role("guest", "reviews.write")
        .await
        .unwrap();

    assert!(h.resolver.has_permission(7, "reviews.write").await.unwrap());
    assert!(h.resolver.has_permission(8, "reviews.write").await.unwrap());
    assert!(!h.resolver.has_permission(9, "reviews.write").await.unwrap());

    h.resolver
        .revoke_permission_from_role(Role::new(GUEST_ROLE, "guest", vec![]), "reviews.write")
        .await
        .unwrap();
    assert!(!h.resolver.has_permission(7, "reviews.write").await.unwrap());
}

#[tokio::test]
async fn test_deleting_role_invalidates_former_members() {
    let h = harness().await;
    h.resolver.assign_role(7, "property_manager").await.unwrap();
    assert!(h.resolver.has_permission(7, "properties.edit").await.unwrap());

    assert!(h.resolver.delete_role("property_manager").await.unwrap());
    assert!(!h.resolver.has_permission(7, "properties.edit").await.unwrap());
    assert!(h.roles.members_of_role(MANAGER_ROLE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revoking_direct_permission() {
    let h = harness().await;
    h.resolver.grant_permission(7, "messages.send").await.unwrap();
    assert!(h.resolver.has_permission(7, "messages.send").await.unwrap());

    assert!(h.resolver.revoke_permission(7, "messages.send").await.unwrap());
    assert!(!h.resolver.has_permission(7, "messages.send").await.unwrap());
    assert!(!h.resolver.revoke_permission(7, "messages.send").await.unwrap());
}
