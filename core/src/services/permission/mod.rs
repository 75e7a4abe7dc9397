//! Role and permission resolution with a ledger-backed cache.

mod cache;
mod resolver;

#[cfg(test)]
mod tests;

pub use cache::PermissionCache;
pub use resolver::PermissionResolver;
