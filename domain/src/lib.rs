//! Domain layer for switchboard
//!
//! This crate contains the core business logic, entities, and value objects
//! of the orchestration core. It has no dependencies on infrastructure or
//! transport concerns.
//!
//! # Core Concepts
//!
//! ## Agents and Routing
//!
//! An **agent** is a named capability handler that scores its relevance to a
//! query and produces a partial answer. The router ranks all registered
//! agents and selects a bounded subset (at most 3) per query, with a
//! guaranteed fallback so routing never dead-ends.
//!
//! ## Tools
//!
//! A **tool** is a schema-described, independently invocable operation:
//! a [`ToolDefinition`] contract plus a [`ToolHandler`] executable, held in
//! the [`ToolRegistry`].
//!
//! ## Conversations
//!
//! A **conversation** is the event-sourced audit unit: every decision, tool
//! execution, and escalation is an immutable event, and state is always
//! derivable by replay.

pub mod agent;
pub mod compose;
pub mod conversation;
pub mod core;
pub mod protocol;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    entities::{AgentResult, TriggerKeyword},
    provider::{Agent, AgentContext, AgentError},
    router::{AgentRouter, DEFAULT_FALLBACK_AGENT, MAX_SELECTED_AGENTS, keyword_score},
};
pub use compose::{
    ComposedResponse, FALLBACK_CONFIDENCE, FALLBACK_CONTENT, MULTI_AGENT_BASELINE,
    ResponseComposer, SINGLE_AGENT_CONFIDENCE,
};
pub use conversation::{
    Conversation, ConversationEvent, ConversationId, DEFAULT_CONFIDENCE_THRESHOLD,
    InterventionType, LOW_CONFIDENCE_REASON, ReplayError,
};
pub use core::{error::DomainError, query::Query};
pub use protocol::{
    InvocationMethod, InvocationRequest, InvocationResponse, PromptTemplate, ResponseMetadata,
};
pub use tool::{
    entities::{ToolCategory, ToolDefinition},
    handler::{FnToolHandler, ToolHandler},
    registry::{RegisteredTool, ToolRegistry},
    schema::{PropertyType, SchemaProperty, SchemaViolation, ToolSchema},
    value_objects::ToolError,
};
