//! Agent Router
//!
//! The [`AgentRouter`] ranks registered agents against a query and selects
//! at most [`MAX_SELECTED_AGENTS`] of them. The cap bounds downstream
//! composition cost; the designated fallback keeps routing total — a query
//! that matches nothing still reaches one agent.
//!
//! # Selection rules
//!
//! 1. Every registered agent is scored (weighted keyword overlap by default).
//! 2. Agents with score > 0 are ranked descending; ties break in
//!    registration order (stable sort).
//! 3. The top 3 are returned. If every agent scored 0, the designated
//!    fallback agent (by name, default "general") is returned alone; if that
//!    name is unregistered, the first-registered agent stands in.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::query::Query;

use super::entities::TriggerKeyword;
use super::provider::Agent;

/// Hard cap on agents selected per query
pub const MAX_SELECTED_AGENTS: usize = 3;

/// Name the router looks for when no fallback is designated explicitly
pub const DEFAULT_FALLBACK_AGENT: &str = "general";

/// Weighted keyword overlap between a query and declared trigger terms.
///
/// Single-word terms match against the query's tokens; multi-word terms
/// match as phrases on the normalized query text. Each term contributes its
/// weight at most once.
pub fn keyword_score(query: &Query, triggers: &[TriggerKeyword]) -> f64 {
    let tokens = query.tokens();
    let normalized = query.normalized();

    triggers
        .iter()
        .filter(|kw| {
            if kw.term.contains(char::is_whitespace) {
                normalized.contains(&kw.term)
            } else {
                tokens.iter().any(|t| t == &kw.term)
            }
        })
        .map(|kw| kw.weight)
        .sum()
}

/// Router over registered agents
#[derive(Clone, Default)]
pub struct AgentRouter {
    agents: Vec<Arc<dyn Agent>>,
    fallback: Option<String>,
}

impl AgentRouter {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            fallback: None,
        }
    }

    /// Register an agent. Re-registering a name replaces the agent in place,
    /// keeping its original registration-order slot.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        if let Some(slot) = self.agents.iter_mut().find(|a| a.name() == agent.name()) {
            *slot = agent;
        } else {
            self.agents.push(agent);
        }
    }

    /// Builder-style registration
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.register(agent);
        self
    }

    /// Designate the fallback agent by name
    pub fn with_fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = Some(name.into());
        self
    }

    /// Get a registered agent by name
    pub fn agent(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.iter().find(|a| a.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Select up to [`MAX_SELECTED_AGENTS`] agents for a query.
    ///
    /// Never returns empty while at least one agent is registered.
    pub fn route(&self, query: &Query) -> Vec<Arc<dyn Agent>> {
        let mut scored: Vec<(Arc<dyn Agent>, f64)> = self
            .agents
            .iter()
            .map(|a| (a.clone(), a.score(query)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Stable sort: equal scores keep registration order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_SELECTED_AGENTS);

        if scored.is_empty() {
            return self.fallback_agent().into_iter().collect();
        }

        scored.into_iter().map(|(agent, _)| agent).collect()
    }

    /// Score of every registered agent, including zero scores.
    ///
    /// Diagnostics surface: contains exactly one entry per registered agent.
    pub fn agent_scores(&self, query: &Query) -> HashMap<String, f64> {
        self.agents
            .iter()
            .map(|a| (a.name().to_string(), a.score(query)))
            .collect()
    }

    /// The agent used when every score is zero: the designated fallback if
    /// registered, otherwise the first-registered agent.
    pub fn fallback_agent(&self) -> Option<Arc<dyn Agent>> {
        let name = self.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK_AGENT);
        self.agent(name).or_else(|| self.agents.first().cloned())
    }
}
