//! Masking helpers for logging credentials
//!
//! Plaintext tokens, keys and secrets never reach a log line. Only a short
//! prefix survives, enough to correlate entries during an incident.

/// Number of leading characters kept visible
const VISIBLE_PREFIX: usize = 8;

/// Mask a token or key, keeping only its first characters
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(VISIBLE_PREFIX).collect();
    if secret.chars().count() <= VISIBLE_PREFIX {
        "********".to_string()
    } else {
        format!("{}********", visible)
    }
}

/// Mask the final segment of a `:`-separated store key
///
/// Store keys often end in a credential, as in `oauth:code:<code>`.
pub fn mask_key(key: &str) -> String {
    match key.rsplit_once(':') {
        Some((namespace, last)) => format!("{}:{}", namespace, mask_secret(last)),
        None => mask_secret(key),
    }
}

/// Mask an email address (keep the first character and the domain)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
