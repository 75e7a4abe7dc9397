//! Access token issuer
//!
//! Access tokens are never stored. They are checked by signature and validity
//! window, plus a lookup in the short-lived denylist written at logout.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{ledger_keys, LedgerStore};

use super::codec::TokenCodec;

pub struct AccessTokenIssuer {
    codec: Arc<TokenCodec>,
    ledger: Arc<dyn LedgerStore>,
    ttl: i64,
}

impl AccessTokenIssuer {
    /// # Arguments
    ///
    /// * `codec` - Shared token codec
    /// * `ledger` - Ledger holding the denylist
    /// * `ttl` - Access token lifetime in seconds
    pub fn new(codec: Arc<TokenCodec>, ledger: Arc<dyn LedgerStore>, ttl: i64) -> Self {
        Self { codec, ledger, ttl }
    }

    /// Lifetime of issued tokens in seconds
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Mints an access token carrying a snapshot of the user
    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        let claims = AccessClaims::new(
            self.codec.issuer(),
            user,
            Uuid::new_v4().to_string(),
            self.codec.now(),
            self.ttl,
        );
        Ok(self.codec.sign(&claims)?)
    }

    /// Verifies an access token and checks the denylist
    pub async fn verify(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let claims: AccessClaims = self.codec.verify(token).map_err(|e| {
            debug!(kind = e.kind(), "Access token rejected");
            e
        })?;

        if claims.token_type != TokenType::Access {
            debug!(jti = %claims.jti, "Refresh token presented as access token");
            return Err(TokenError::WrongType {
                expected: TokenType::Access.to_string(),
            }
            .into());
        }

        if self.ledger.exists(&ledger_keys::blacklist(&claims.jti)).await? {
            debug!(jti = %claims.jti, "Denylisted access token presented");
            return Err(TokenError::Revoked.into());
        }

        Ok(claims)
    }

    /// Denylists an access token for the rest of its lifetime
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The token was denylisted
    /// * `Ok(false)` - The token is unreadable, expired or not an access token
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        let claims: AccessClaims = match self.codec.decode_signed(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(kind = e.kind(), "Ignoring revocation of unreadable access token");
                return Ok(false);
            }
        };

        if claims.token_type != TokenType::Access {
            return Ok(false);
        }

        let remaining = claims.remaining_lifetime(self.codec.now());
        if remaining == 0 {
            return Ok(false);
        }

        self.ledger
            .put(&ledger_keys::blacklist(&claims.jti), "1", remaining as u64)
            .await?;
        debug!(jti = %claims.jti, ttl = remaining, "Access token denylisted");
        Ok(true)
    }
}
