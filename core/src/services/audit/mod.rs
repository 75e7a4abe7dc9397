//! Audit module for recording authentication and authorization events.
//!
//! Writes are best effort. A failing sink is logged and never changes the
//! outcome of the operation being audited.

mod service;
mod sink;

pub use service::{AuditService, AuditServiceConfig};
pub use sink::{AuditSink, NoOpAuditSink, TracingAuditSink};

#[cfg(test)]
pub use sink::MockAuditSink;

#[cfg(test)]
mod tests;
