//! Response composition — merging agent results into one answer.
//!
//! The composer owns confidence assignment policy:
//!
//! | Inputs | Content | Confidence |
//! |--------|---------|------------|
//! | 0 | fixed fallback text | [`FALLBACK_CONFIDENCE`] (0.3) |
//! | 1 | passed through unchanged | [`SINGLE_AGENT_CONFIDENCE`] (0.85) |
//! | n ≥ 2 | labeled contributions concatenated | mean of per-agent baselines ([`MULTI_AGENT_BASELINE`]) |
//!
//! Upstream tracks no numeric per-agent confidence, so the multi-agent case
//! averages a fixed baseline per contributor. The baseline vector is built
//! explicitly so an eventual per-result confidence field replaces it without
//! touching the contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::agent::entities::AgentResult;
use crate::core::query::Query;

/// Confidence assigned when no agent produced a result
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
/// Confidence assigned when exactly one agent answered
pub const SINGLE_AGENT_CONFIDENCE: f64 = 0.85;
/// Per-agent baseline averaged in the multi-agent case
pub const MULTI_AGENT_BASELINE: f64 = 0.75;

/// Content returned when composition has nothing to work with
pub const FALLBACK_CONTENT: &str =
    "I wasn't able to find a capability that can help with that. Could you rephrase your request?";

/// The single final answer produced by merging agent results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedResponse {
    /// Unique message id (UUID v4)
    pub message_id: String,
    /// The merged answer content
    pub content: String,
    /// Aggregate confidence in [0, 1]
    pub confidence: f64,
    /// Contributing agents, in rank order
    pub agents_used: Vec<String>,
    /// Tools used across all contributions, first-seen order, deduplicated
    pub tools_used: Vec<String>,
    /// Wall-clock time to produce the response
    pub response_time_ms: u64,
    /// Free-form response metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ComposedResponse {
    fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            agents_used: Vec::new(),
            tools_used: Vec::new(),
            response_time_ms: 0,
            metadata: HashMap::new(),
        }
    }

    /// Stamp the measured response time
    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = response_time_ms;
        self
    }

    /// Whether this response merged more than one agent's contribution
    pub fn is_multi_agent(&self) -> bool {
        self.metadata
            .get("multi_agent")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Merges agent results into a [`ComposedResponse`]
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, results: &[AgentResult], original_query: &Query) -> ComposedResponse {
        match results {
            [] => {
                let mut response = ComposedResponse::new(FALLBACK_CONTENT, FALLBACK_CONFIDENCE);
                response
                    .metadata
                    .insert("query".to_string(), serde_json::json!(original_query.content()));
                response
            }
            [only] => {
                let mut response =
                    ComposedResponse::new(only.content.clone(), SINGLE_AGENT_CONFIDENCE);
                response.agents_used = vec![only.agent_name.clone()];
                response.tools_used = only.tools_used.clone();
                response
            }
            many => {
                let content = many
                    .iter()
                    .map(|r| format!("{}: {}", r.agent_name, r.content))
                    .collect::<Vec<_>>()
                    .join("\n\n");

                let baselines: Vec<f64> = many.iter().map(|_| MULTI_AGENT_BASELINE).collect();
                let confidence = baselines.iter().sum::<f64>() / baselines.len() as f64;

                let mut response = ComposedResponse::new(content, confidence);
                response.agents_used = many.iter().map(|r| r.agent_name.clone()).collect();
                response.tools_used = union_tools(many);
                response
                    .metadata
                    .insert("multi_agent".to_string(), serde_json::json!(true));
                response
            }
        }
    }
}

/// Union of all tool lists, preserving first-seen order without duplicates
fn union_tools(results: &[AgentResult]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tools = Vec::new();
    for result in results {
        for tool in &result.tools_used {
            if seen.insert(tool.clone()) {
                tools.push(tool.clone());
            }
        }
    }
    tools
}
