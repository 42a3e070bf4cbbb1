//! Agent plugin abstraction
//!
//! This module defines the [`Agent`] trait, the seam through which domain
//! capability handlers plug into routing. An agent declares trigger
//! keywords, scores its relevance to a query, and executes against the
//! tools it knows about.
//!
//! The default [`score`](Agent::score) implementation is weighted keyword
//! overlap over the declared triggers; agents with richer relevance logic
//! override it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::query::Query;
use crate::tool::value_objects::ToolError;

use super::entities::{AgentResult, TriggerKeyword};
use super::router::keyword_score;

/// Error type for agent execution
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent could not produce an answer
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// A tool the agent depends on failed
    #[error("Tool failure: {0}")]
    Tool(#[from] ToolError),
}

/// Per-request context handed to an executing agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentContext {
    /// Caller identity, when known
    pub user_id: Option<String>,
    /// Conversation this request belongs to
    pub conversation_id: Option<String>,
    /// Free-form context (e.g. extracted intent and entities)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A named capability handler that participates in routing.
///
/// Implementations must be cheap to `score` — routing calls it for every
/// registered agent on every query. Only `execute` may perform I/O.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique name within a router instance
    fn name(&self) -> &str;

    /// Declared trigger terms used by the default scoring
    fn triggers(&self) -> &[TriggerKeyword];

    /// Non-negative relevance of this agent to the query
    fn score(&self, query: &Query) -> f64 {
        keyword_score(query, self.triggers())
    }

    /// Produce this agent's partial answer
    async fn execute(&self, query: &Query, context: &AgentContext)
    -> Result<AgentResult, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GreeterAgent {
        triggers: Vec<TriggerKeyword>,
    }

    impl GreeterAgent {
        fn new() -> Self {
            Self {
                triggers: vec![
                    TriggerKeyword::domain("hello"),
                    TriggerKeyword::generic("hi"),
                ],
            }
        }
    }

    #[async_trait]
    impl Agent for GreeterAgent {
        fn name(&self) -> &str {
            "greeter"
        }

        fn triggers(&self) -> &[TriggerKeyword] {
            &self.triggers
        }

        async fn execute(
            &self,
            _query: &Query,
            context: &AgentContext,
        ) -> Result<AgentResult, AgentError> {
            let who = context.user_id.as_deref().unwrap_or("there");
            Ok(AgentResult::new(self.name(), format!("Hello, {}!", who)))
        }
    }

    #[test]
    fn test_default_score_uses_triggers() {
        let agent = GreeterAgent::new();
        assert_eq!(agent.score(&Query::new("hello world")), 2.0);
        assert_eq!(agent.score(&Query::new("say hi")), 1.0);
        assert_eq!(agent.score(&Query::new("unrelated")), 0.0);
    }

    #[tokio::test]
    async fn test_execute_reads_context() {
        let agent = GreeterAgent::new();
        let context = AgentContext::new().with_user_id("u-1");
        let result = agent
            .execute(&Query::new("hello"), &context)
            .await
            .unwrap();
        assert_eq!(result.agent_name, "greeter");
        assert!(result.content.contains("u-1"));
    }
}
