//! Tool handler abstraction
//!
//! A [`ToolHandler`] is the executable half of a registered tool. Handlers
//! are the only part of the pipeline expected to perform I/O — the registry
//! and protocol server around them are pure bookkeeping.
//!
//! Domain modules plug in by implementing the trait, or by wrapping a plain
//! function in [`FnToolHandler`] when no state or I/O is involved.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::value_objects::ToolError;

/// Executable behind a registered tool.
///
/// Arguments arrive already validated against the tool's input schema;
/// handlers may still fail with their own [`ToolError`]s (e.g. a backing
/// service refusing the operation).
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments
    async fn execute(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ToolError>;
}

type HandlerFn = dyn Fn(&HashMap<String, serde_json::Value>) -> Result<serde_json::Value, ToolError>
    + Send
    + Sync;

/// Function-backed handler for tools with no async work of their own.
pub struct FnToolHandler {
    func: Arc<HandlerFn>,
}

impl FnToolHandler {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&HashMap<String, serde_json::Value>) -> Result<serde_json::Value, ToolError>
            + Send
            + Sync
            + 'static,
    {
        Self { func: Arc::new(func) }
    }
}

#[async_trait]
impl ToolHandler for FnToolHandler {
    async fn execute(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ToolError> {
        (self.func)(arguments)
    }
}
