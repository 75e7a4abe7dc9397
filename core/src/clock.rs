//! Wall-clock abstraction
//!
//! Token expiry, ledger TTLs and API-key expiry are all evaluated against an
//! injected [`Clock`] so that tests can advance time deterministically.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as a Unix timestamp in seconds
    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use mock::MockClock;
