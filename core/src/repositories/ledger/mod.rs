//! Key-value ledger with per-key TTL.

mod r#trait;
pub use r#trait::LedgerStore;

pub mod keys;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::MockLedgerStore;
