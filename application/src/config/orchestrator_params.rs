//! Orchestrator parameters — pipeline policy knobs.
//!
//! [`OrchestratorParams`] groups the static parameters shared by the
//! protocol server, the conversation service, and the router wiring. These
//! are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use switchboard_domain::agent::router::DEFAULT_FALLBACK_AGENT;
use switchboard_domain::conversation::DEFAULT_CONFIDENCE_THRESHOLD;

/// Pipeline policy parameters.
///
/// | Field | Consumer |
/// |-------|----------|
/// | `confidence_threshold` | Conversation service (auto-escalation) |
/// | `call_timeout` | Protocol server (tool execution bound) |
/// | `fallback_agent` | Router wiring (zero-score fallback name) |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Decisions below this confidence auto-escalate to a human.
    pub confidence_threshold: f64,
    /// Upper bound on a single tool execution. `None` disables the bound.
    pub call_timeout: Option<Duration>,
    /// Name of the agent used when every routing score is zero.
    pub fallback_agent: String,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            call_timeout: Some(Duration::from_secs(30)),
            fallback_agent: DEFAULT_FALLBACK_AGENT.to_string(),
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_fallback_agent(mut self, name: impl Into<String>) -> Self {
        self.fallback_agent = name.into();
        self
    }
}
