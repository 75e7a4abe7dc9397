//! Audit service dispatching events to a sink without affecting callers

use std::sync::Arc;

use tokio::task;
use tracing::warn;

use crate::domain::entities::audit::AuditEvent;

use super::sink::{AuditSink, NoOpAuditSink};

/// Configuration for the audit service
#[derive(Debug, Clone)]
pub struct AuditServiceConfig {
    /// Write from a background task instead of awaiting the sink
    pub async_writes: bool,
}

impl Default for AuditServiceConfig {
    fn default() -> Self {
        Self { async_writes: true }
    }
}

/// Fire-and-forget front for an [`AuditSink`]
#[derive(Clone)]
pub struct AuditService {
    sink: Arc<dyn AuditSink>,
    config: AuditServiceConfig,
}

impl AuditService {
    pub fn new(sink: Arc<dyn AuditSink>, config: AuditServiceConfig) -> Self {
        Self { sink, config }
    }

    /// Service that drops every event
    pub fn disabled() -> Self {
        Self::new(
            Arc::new(NoOpAuditSink),
            AuditServiceConfig {
                async_writes: false,
            },
        )
    }

    /// Record an event; failures are logged and swallowed
    pub async fn record(&self, event: AuditEvent) {
        if self.config.async_writes {
            let sink = Arc::clone(&self.sink);
            task::spawn(async move {
                let event_type = event.event_type;
                if let Err(e) = sink.record(event).await {
                    warn!(event_type = event_type.as_str(), error = %e, "Failed to write audit event");
                }
            });
        } else {
            let event_type = event.event_type;
            if let Err(e) = self.sink.record(event).await {
                warn!(event_type = event_type.as_str(), error = %e, "Failed to write audit event");
            }
        }
    }
}
