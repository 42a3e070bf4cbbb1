//! Tool domain value objects — immutable error types.
//!
//! Every failure that crosses the invocation protocol boundary is a
//! [`ToolError`] with a stable code and a human-readable message. Raw
//! internal error text never leaves the crate: handler failures are wrapped
//! in `EXECUTION_FAILED` with the handler's own message.

use serde::{Deserialize, Serialize};

/// Error that occurred while resolving or executing a tool.
///
/// Error codes are the stable, caller-facing taxonomy:
///
/// | Code | Meaning |
/// |------|---------|
/// | `TOOL_NOT_FOUND` | Named tool is not registered |
/// | `INVALID_INPUT` | Arguments violated the input schema |
/// | `UNAUTHORIZED` | Tool requires auth and the user id is absent or unresolvable |
/// | `EXECUTION_FAILED` | Handler-level failure or timeout |
/// | `DUPLICATE_CAPABILITY` | Strict-mode registration conflict |
/// | `CONVERSATION_NOT_FOUND` | Replay of an unknown conversation id |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Stable error code (e.g., "TOOL_NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new("TOOL_NOT_FOUND", format!("Tool not found: {}", name.into()))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("INVALID_INPUT", message)
    }

    pub fn unauthorized(tool: impl Into<String>) -> Self {
        Self::new(
            "UNAUTHORIZED",
            format!("Tool '{}' requires an authorized user", tool.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout() -> Self {
        Self::new("EXECUTION_FAILED", "timeout")
    }

    pub fn duplicate_capability(name: impl Into<String>) -> Self {
        Self::new(
            "DUPLICATE_CAPABILITY",
            format!("Capability already registered: {}", name.into()),
        )
    }

    pub fn conversation_not_found(id: impl Into<String>) -> Self {
        Self::new(
            "CONVERSATION_NOT_FOUND",
            format!("Conversation not found: {}", id.into()),
        )
    }

    /// Whether this error is the execution-timeout case
    pub fn is_timeout(&self) -> bool {
        self.code == "EXECUTION_FAILED" && self.message == "timeout"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}
