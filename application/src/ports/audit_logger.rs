//! Port for structured audit logging.
//!
//! Defines the [`AuditLogger`] trait for recording pipeline activity
//! (protocol invocations, composed responses, cache hits) to a structured
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable activity trail (JSONL). It is also separate from the
//! conversation event log — audit lines are operational telemetry, not
//! replayable domain events.

use serde_json::Value;

/// A structured audit record.
///
/// Each record has a type string and a JSON payload with record-specific
/// fields; adapters add the timestamp at write time.
pub struct AuditEvent {
    /// Record type identifier (e.g., "tool_invoked", "query_processed").
    pub event_type: &'static str,
    /// JSON payload with record-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self { event_type, payload }
    }
}

/// Port for writing audit records to a structured log.
///
/// Implementations write each record as a single line. The `log` method is
/// intentionally synchronous and non-fallible to avoid disrupting the main
/// execution flow — logging failures are silently ignored.
pub trait AuditLogger: Send + Sync {
    /// Record an audit event.
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
