//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// A dotted permission string, optionally ending in a `.*` wildcard, or `*` alone
static PERMISSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*|[a-z][a-z0-9_-]*(\.[a-z][a-z0-9_-]*)*(\.\*)?)$")
        .expect("permission pattern is a valid regex")
});

/// Check a permission string such as `properties.edit.own`, `bookings.*` or `*`
pub fn is_valid_permission(permission: &str) -> bool {
    PERMISSION_PATTERN.is_match(permission)
}

/// Scopes share the permission alphabet
pub fn is_valid_scope(scope: &str) -> bool {
    is_valid_permission(scope)
}

/// Common validation functions
pub mod validators {
    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.len();
        len >= min && len <= max
    }

    /// Check if an email address is valid (basic check)
    pub fn is_valid_email(email: &str) -> bool {
        email.contains('@') && email.contains('.') && email.len() >= 5
    }

    /// Check if a redirect URI is absolute and carries no fragment
    pub fn is_valid_redirect_uri(uri: &str) -> bool {
        (uri.starts_with("https://") || uri.starts_with("http://")) && !uri.contains('#')
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;
    use super::*;

    #[test]
    fn test_valid_permissions() {
        assert!(is_valid_permission("*"));
        assert!(is_valid_permission("properties"));
        assert!(is_valid_permission("properties.edit"));
        assert!(is_valid_permission("properties.edit.own"));
        assert!(is_valid_permission("properties.*"));
        assert!(is_valid_permission("api_keys.manage"));
    }

    #[test]
    fn test_invalid_permissions() {
        assert!(!is_valid_permission(""));
        assert!(!is_valid_permission("properties."));
        assert!(!is_valid_permission(".edit"));
        assert!(!is_valid_permission("properties.*.edit"));
        assert!(!is_valid_permission("Properties.Edit"));
        assert!(!is_valid_permission("properties edit"));
        assert!(!is_valid_permission("**"));
    }

    #[test]
    fn test_redirect_uri() {
        assert!(is_valid_redirect_uri("https://app.example.com/callback"));
        assert!(!is_valid_redirect_uri("app.example.com/callback"));
        assert!(!is_valid_redirect_uri("https://app.example.com/callback#frag"));
    }

    #[test]
    fn test_length_between() {
        assert!(length_between("abc", 1, 3));
        assert!(!length_between("abcd", 1, 3));
        assert!(not_empty(" a "));
        assert!(!not_empty("   "));
    }
}
