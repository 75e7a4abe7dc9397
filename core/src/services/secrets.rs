//! Random token generation and one-way hashing helpers

use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::DomainError;

/// Hex-encoded string of `bytes` random bytes from the thread CSPRNG
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two digests without short-circuiting
pub fn digests_match(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// Verify a secret against a bcrypt hash off the async executor
///
/// A malformed hash counts as a mismatch.
pub async fn bcrypt_verify(secret: &str, hash: &str) -> Result<bool, DomainError> {
    let secret = secret.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash).unwrap_or(false))
        .await
        .map_err(|e| DomainError::internal(format!("bcrypt task failed: {}", e)))
}
