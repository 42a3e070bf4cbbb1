//! Tool domain module
//!
//! Tools are schema-described, independently invocable capabilities. A
//! [`ToolDefinition`](entities::ToolDefinition) declares the contract
//! (category, input/output schemas, cache policy, authorization), a
//! [`ToolHandler`](handler::ToolHandler) supplies the executable, and the
//! [`ToolRegistry`](registry::ToolRegistry) maps names to both.

pub mod entities;
pub mod handler;
pub mod registry;
pub mod schema;
pub mod value_objects;

pub use entities::{ToolCategory, ToolDefinition};
pub use handler::{FnToolHandler, ToolHandler};
pub use registry::{RegisteredTool, ToolRegistry};
pub use schema::{PropertyType, SchemaProperty, SchemaViolation, ToolSchema};
pub use value_objects::ToolError;
