//! Audit sink port — one record per pipeline decision.
//!
//! The pipeline emits an event when a stage produces its outcome
//! (resolved intent, plan, execution result). Sinks must be fire-and-
//! forget: recording never fails the request.

use serde_json::Value;

/// One pipeline decision, ready for structured storage.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Stage that produced the decision: `resolve`, `plan`, `execute`.
    pub stage: &'static str,
    pub trace_id: Option<String>,
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(stage: &'static str, trace_id: Option<String>, payload: Value) -> Self {
        Self {
            stage,
            trace_id,
            payload,
        }
    }
}

/// Port for recording audit events.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record(&self, _event: AuditEvent) {}
}
