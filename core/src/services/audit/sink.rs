//! Audit sinks

use async_trait::async_trait;
use tracing::info;

use crate::domain::entities::audit::AuditEvent;
use crate::errors::DomainResult;

/// Destination for audit events
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent) -> DomainResult<()>;
}

/// Emits each event as a structured `info` record on the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> DomainResult<()> {
        info!(
            target: "audit",
            event_type = event.event_type.as_str(),
            user_id = event.user_id,
            client_id = event.client_id.as_deref(),
            failure_reason = event.failure_reason.as_deref(),
            occurred_at = %event.occurred_at,
            "audit event"
        );
        Ok(())
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuditSink;

#[async_trait]
impl AuditSink for NoOpAuditSink {
    async fn record(&self, _event: AuditEvent) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
pub use mock::MockAuditSink;
