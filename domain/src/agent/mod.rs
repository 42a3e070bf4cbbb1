//! Agent domain module
//!
//! An agent is a named capability handler: it scores its own relevance to a
//! query and produces a partial answer, typically by calling tools through
//! the invocation protocol. The [`AgentRouter`](router::AgentRouter) ranks
//! registered agents and selects a bounded subset per query.

pub mod entities;
pub mod provider;
pub mod router;

pub use entities::{AgentResult, TriggerKeyword};
pub use provider::{Agent, AgentContext, AgentError};
pub use router::{AgentRouter, MAX_SELECTED_AGENTS, keyword_score};
