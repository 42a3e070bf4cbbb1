//! Agent domain entities

use serde::{Deserialize, Serialize};

/// A weighted trigger term declared by an agent.
///
/// Routing scores a query by summing the weights of matched terms. Exact
/// domain vocabulary ("balance", "transfer") is declared with higher weight
/// than generic filler ("check", "show") so specific queries beat vague ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerKeyword {
    /// The term to match. Single words match tokens; multi-word terms match
    /// as phrases on the normalized query.
    pub term: String,
    /// Contribution to the score when matched
    pub weight: f64,
}

impl TriggerKeyword {
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into().to_lowercase(),
            weight: weight.max(0.0),
        }
    }

    /// A domain-specific term (weight 2.0)
    pub fn domain(term: impl Into<String>) -> Self {
        Self::new(term, 2.0)
    }

    /// A generic term (weight 1.0)
    pub fn generic(term: impl Into<String>) -> Self {
        Self::new(term, 1.0)
    }
}

/// One agent's partial answer, immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Name of the agent that produced this result
    pub agent_name: String,
    /// The answer content
    pub content: String,
    /// Raw tool outputs the agent used
    pub tool_outputs: Vec<serde_json::Value>,
    /// Names of the tools the agent used, in invocation order
    pub tools_used: Vec<String>,
}

impl AgentResult {
    pub fn new(agent_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            content: content.into(),
            tool_outputs: Vec::new(),
            tools_used: Vec::new(),
        }
    }

    pub fn with_tool_output(
        mut self,
        tool_name: impl Into<String>,
        output: serde_json::Value,
    ) -> Self {
        self.tools_used.push(tool_name.into());
        self.tool_outputs.push(output);
        self
    }
}
