//! API key issuance and validation for machine-to-machine access.

mod service;

#[cfg(test)]
mod tests;

pub use service::ApiKeyService;
