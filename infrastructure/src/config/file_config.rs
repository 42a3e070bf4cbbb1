//! File configuration structures (TOML shape).
//!
//! ```toml
//! [orchestrator]
//! confidence_threshold = 0.8
//! call_timeout_secs = 30
//! fallback_agent = "general"
//!
//! [audit]
//! log_path = "logs/switchboard.audit.jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use switchboard_application::config::OrchestratorParams;

/// Root configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub orchestrator: FileOrchestratorConfig,
    #[serde(default)]
    pub audit: FileAuditConfig,
}

/// `[orchestrator]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOrchestratorConfig {
    /// Decisions below this confidence auto-escalate to a human.
    pub confidence_threshold: f64,
    /// Upper bound on a single tool execution, in seconds. Omit to disable.
    pub call_timeout_secs: Option<u64>,
    /// Agent used when every routing score is zero.
    pub fallback_agent: String,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let params = OrchestratorParams::default();
        Self {
            confidence_threshold: params.confidence_threshold,
            call_timeout_secs: params.call_timeout.map(|t| t.as_secs()),
            fallback_agent: params.fallback_agent,
        }
    }
}

/// `[audit]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileAuditConfig {
    /// JSONL audit log path; auditing is disabled when omitted.
    pub log_path: Option<String>,
}

impl FileConfig {
    /// Produce the application-layer parameters from this file config.
    pub fn orchestrator_params(&self) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_confidence_threshold(self.orchestrator.confidence_threshold)
            .with_call_timeout(
                self.orchestrator
                    .call_timeout_secs
                    .map(Duration::from_secs),
            )
            .with_fallback_agent(self.orchestrator.fallback_agent.clone())
    }
}
