//! Tests for the Redis client and ledger

#[cfg(test)]
mod redis_ledger_tests;
