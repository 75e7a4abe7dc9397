//! OAuth2 authorization-code and refresh grants with opaque, stored tokens.
//!
//! Lifecycle of a grant: a code is issued into the ledger, exchanged once for
//! an access/refresh pair persisted as rows, optionally refreshed any number
//! of times, and ends when revoked or expired.

mod service;

#[cfg(test)]
mod tests;

pub use service::OAuthService;
