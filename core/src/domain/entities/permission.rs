//! Roles and hierarchical wildcard permissions.
//!
//! A permission is a dotted string such as `properties.edit.own`. A granted
//! permission ending in `.*` covers every more specific permission under its
//! prefix, and `*` alone covers everything.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Matches everything
pub const WILDCARD: &str = "*";

/// Checks whether one granted permission covers a requested permission
pub fn wildcard_matches(granted: &str, requested: &str) -> bool {
    if granted == WILDCARD || granted == requested {
        return true;
    }

    match granted.strip_suffix(".*") {
        Some(prefix) => requested
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('.')),
        None => false,
    }
}

/// A user's effective permission set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: impl Into<String>) {
        self.0.insert(permission.into());
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Decides whether the set grants a permission
    ///
    /// `*` grants everything, then an exact match, then each `prefix.*` from
    /// the most specific prefix to the least: `properties.edit.own` tests
    /// `properties.edit.*` and then `properties.*`.
    pub fn grants(&self, permission: &str) -> bool {
        if self.contains(WILDCARD) || self.contains(permission) {
            return true;
        }

        let segments: Vec<&str> = permission.split('.').collect();
        (1..segments.len()).rev().any(|depth| {
            let candidate = format!("{}.*", segments[..depth].join("."));
            self.contains(&candidate)
        })
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for PermissionSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// A named role bundling permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<String>,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions,
        }
    }
}

/// A role given either by name or as a loaded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    Name(String),
    Role(Role),
}

impl RoleRef {
    pub fn name(&self) -> &str {
        match self {
            RoleRef::Name(name) => name,
            RoleRef::Role(role) => &role.name,
        }
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl From<String> for RoleRef {
    fn from(name: String) -> Self {
        RoleRef::Name(name)
    }
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        RoleRef::Role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(permissions: &[&str]) -> PermissionSet {
        permissions.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_resource_wildcard() {
        let permissions = set(&["properties.*"]);
        assert!(permissions.grants("properties.edit"));
        assert!(permissions.grants("properties.edit.own"));
        assert!(!permissions.grants("bookings.view"));
    }

    #[test]
    fn test_exact_permission_does_not_cover_siblings() {
        let permissions = set(&["properties.edit"]);
        assert!(permissions.grants("properties.edit"));
        assert!(!permissions.grants("properties.delete"));
    }

    #[test]
    fn test_global_wildcard() {
        assert!(set(&["*"]).grants("users.delete"));
    }

    #[test]
    fn test_nested_wildcard() {
        let permissions = set(&["properties.edit.*"]);
        assert!(permissions.grants("properties.edit.own"));
        assert!(!permissions.grants("properties.edit"));
        assert!(!permissions.grants("properties.view"));
    }

    #[test]
    fn test_wildcard_is_segment_aligned() {
        let permissions = set(&["prop.*"]);
        assert!(!permissions.grants("properties.edit"));
        assert!(!wildcard_matches("prop.*", "properties.edit"));
    }

    #[test]
    fn test_wildcard_matches() {
        assert!(wildcard_matches("*", "anything"));
        assert!(wildcard_matches("bookings.*", "bookings.view"));
        assert!(wildcard_matches("bookings.view", "bookings.view"));
        assert!(!wildcard_matches("bookings.*", "bookings"));
        assert!(!wildcard_matches("bookings.view", "bookings.edit"));
    }

    #[test]
    fn test_deduplicated() {
        let mut permissions = set(&["a.b", "a.b"]);
        permissions.extend(vec!["a.b".to_string(), "c.d".to_string()]);
        assert_eq!(permissions.len(), 2);
    }

    #[test]
    fn test_role_ref_name() {
        let role = Role::new(3, "owner", vec!["properties.*".to_string()]);
        assert_eq!(RoleRef::from("guest").name(), "guest");
        assert_eq!(RoleRef::from(role).name(), "owner");
    }
}
