//! Invocation protocol value objects.
//!
//! The request/response shapes of the protocol server. These are plain
//! value objects; dispatch lives in the application layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tool::value_objects::ToolError;

/// Protocol verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationMethod {
    Initialize,
    ListTools,
    ListPrompts,
    CallTool,
}

impl InvocationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationMethod::Initialize => "initialize",
            InvocationMethod::ListTools => "list-tools",
            InvocationMethod::ListPrompts => "list-prompts",
            InvocationMethod::CallTool => "call-tool",
        }
    }

    /// Every supported verb, in the order advertised by `initialize`
    pub fn all() -> [InvocationMethod; 4] {
        [
            InvocationMethod::Initialize,
            InvocationMethod::ListTools,
            InvocationMethod::ListPrompts,
            InvocationMethod::CallTool,
        ]
    }
}

impl std::fmt::Display for InvocationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvocationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initialize" => Ok(InvocationMethod::Initialize),
            "list-tools" => Ok(InvocationMethod::ListTools),
            "list-prompts" => Ok(InvocationMethod::ListPrompts),
            "call-tool" => Ok(InvocationMethod::CallTool),
            _ => Err(format!("Invalid InvocationMethod: {}", s)),
        }
    }
}

/// One call into the protocol server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// The verb to dispatch
    pub method: InvocationMethod,
    /// Target tool (required for `call-tool`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Call arguments
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    /// Caller identity, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Conversation the call belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl InvocationRequest {
    pub fn new(method: InvocationMethod) -> Self {
        Self {
            method,
            tool_name: None,
            arguments: HashMap::new(),
            user_id: None,
            conversation_id: None,
        }
    }

    /// Convenience constructor for the critical path
    pub fn call_tool(tool_name: impl Into<String>) -> Self {
        Self {
            method: InvocationMethod::CallTool,
            tool_name: Some(tool_name.into()),
            arguments: HashMap::new(),
            user_id: None,
            conversation_id: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

/// Execution metadata attached to every response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Wall-clock duration of the dispatched work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Whether the result was served from the cache
    #[serde(default)]
    pub cache_hit: bool,
}

/// Result of one protocol request.
///
/// Exactly one of `data` / `error` is populated; the constructors are the
/// only way to build one, which keeps that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload (successful requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Structured failure (failed requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Execution metadata
    #[serde(default)]
    pub metadata: ResponseMetadata,
}

impl InvocationResponse {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn failure(error: ToolError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn cache_hit(mut self) -> Self {
        self.metadata.cache_hit = true;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }
}

/// An example invocation template surfaced by `list-prompts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name (e.g. "lookup-example")
    pub name: String,
    /// Category the template illustrates
    pub category: String,
    /// Tool the template targets
    pub tool: String,
    /// Example request text
    pub template: String,
}
