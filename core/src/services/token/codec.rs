//! Signed token codec
//!
//! One symmetric secret and one algorithm for the whole process. The
//! signature and issuer are checked by `jsonwebtoken`; expiry and not-before
//! are checked here against the injected clock so that simulated time works.

use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rh_shared::config::JwtConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::domain::entities::token::RegisteredClaims;
use crate::errors::{DomainError, TokenError};

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    issuer: String,
    leeway: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec from the JWT configuration
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Internal)` - The configured algorithm is not a
    ///   supported symmetric algorithm
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| DomainError::internal(format!("Unknown JWT algorithm {}", config.algorithm)))?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::internal(format!(
                "JWT algorithm {} is not a shared-secret algorithm",
                config.algorithm
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm,
            validation,
            issuer: config.issuer.clone(),
            leeway: config.leeway.max(0),
            clock,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Current time from the codec's clock, in seconds
    pub fn now(&self) -> i64 {
        self.clock.timestamp()
    }

    /// Signs claims into a compact token
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Token signing failed");
            TokenError::SigningFailed
        })
    }

    /// Verifies signature, issuer, expiry and not-before
    pub fn verify<C>(&self, token: &str) -> Result<C, TokenError>
    where
        C: DeserializeOwned + RegisteredClaims,
    {
        let claims: C = self.decode_signed(token)?;
        let now = self.now();

        if now >= claims.expires_at() + self.leeway {
            return Err(TokenError::Expired);
        }
        if now + self.leeway < claims.not_before() {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }

    /// Verifies signature and issuer only, ignoring the validity window
    ///
    /// Used where an expired token must still be identified, e.g. to revoke it.
    pub fn decode_signed<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<C>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}
