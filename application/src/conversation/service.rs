//! Conversation service — live aggregates plus event-store fan-out.
//!
//! The [`ConversationService`] is the single writer path to conversation
//! logs. It keeps live [`Conversation`] aggregates behind **per-conversation
//! mutexes**: commands for the same id serialize (so the automatic
//! low-confidence escalation always lands immediately after its triggering
//! decision), while different ids proceed fully in parallel.
//!
//! Every event a command emits is forwarded to the [`EventStore`] in
//! emission order while the conversation's lock is still held. Reads of
//! unknown ids fall back to replaying the store; ids absent there too fail
//! with `ConversationNotFound`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use switchboard_domain::conversation::{Conversation, ConversationEvent, ConversationId};
use switchboard_domain::core::error::DomainError;

use crate::ports::event_store::EventStore;

/// Single-writer coordinator over conversation aggregates.
pub struct ConversationService {
    store: Arc<dyn EventStore>,
    live: Mutex<HashMap<ConversationId, Arc<Mutex<Conversation>>>>,
    confidence_threshold: f64,
}

impl ConversationService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            live: Mutex::new(HashMap::new()),
            confidence_threshold: switchboard_domain::conversation::DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Override the auto-escalation threshold applied to new conversations.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Start a conversation if it does not exist yet.
    ///
    /// Returns `true` when a new conversation was started; `false` when the
    /// id was already live or stored.
    pub fn start_conversation(
        &self,
        id: &ConversationId,
        agent_type: impl Into<String>,
        user_id: Option<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> bool {
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        if live.contains_key(id) {
            return false;
        }
        // A stored conversation that fell out of the live map counts too
        if let Some(conversation) = self.hydrate(id) {
            live.insert(id.clone(), conversation);
            return false;
        }

        let conversation = Conversation::start(id.clone(), agent_type, user_id, context)
            .with_confidence_threshold(self.confidence_threshold);
        self.store.append(id, conversation.events());
        live.insert(id.clone(), Arc::new(Mutex::new(conversation)));
        true
    }

    /// Record an AI decision; the low-confidence escalation, when triggered,
    /// is part of the returned event list.
    pub fn make_decision(
        &self,
        id: &ConversationId,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        confidence: f64,
    ) -> Result<Vec<ConversationEvent>, DomainError> {
        self.command(id, |conversation| {
            conversation.make_decision(decision, reasoning, confidence)
        })
    }

    /// Record a tool execution outcome.
    pub fn record_tool_execution(
        &self,
        id: &ConversationId,
        tool: impl Into<String>,
        params: HashMap<String, serde_json::Value>,
        result: impl Into<String>,
        duration_ms: u64,
        success: bool,
    ) -> Result<Vec<ConversationEvent>, DomainError> {
        self.command(id, |conversation| {
            conversation.record_tool_execution(tool, params, result, duration_ms, success)
        })
    }

    /// Explicit escalation to a human.
    pub fn request_human_intervention(
        &self,
        id: &ConversationId,
        reason: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Result<Vec<ConversationEvent>, DomainError> {
        self.command(id, |conversation| {
            conversation.request_human_intervention(reason, context)
        })
    }

    /// Record a human override of an AI decision.
    pub fn record_human_override(
        &self,
        id: &ConversationId,
        original: impl Into<String>,
        overridden: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<Vec<ConversationEvent>, DomainError> {
        self.command(id, |conversation| {
            conversation.record_human_override(original, overridden, reason)
        })
    }

    /// Retrieve a conversation, replaying from the store when it is not live.
    pub fn get(&self, id: &ConversationId) -> Result<Conversation, DomainError> {
        if let Some(entry) = self.entry(id) {
            let conversation = entry.lock().unwrap_or_else(|e| e.into_inner());
            return Ok(conversation.clone());
        }
        Err(DomainError::ConversationNotFound(id.to_string()))
    }

    // ==================== Internals ====================

    /// Run a command under the conversation's lock and forward the emitted
    /// events to the store before releasing it.
    fn command<F>(&self, id: &ConversationId, f: F) -> Result<Vec<ConversationEvent>, DomainError>
    where
        F: FnOnce(&mut Conversation) -> Vec<ConversationEvent>,
    {
        let entry = self
            .entry(id)
            .ok_or_else(|| DomainError::ConversationNotFound(id.to_string()))?;

        let mut conversation = entry.lock().unwrap_or_else(|e| e.into_inner());
        let emitted = f(&mut conversation);
        self.store.append(id, &emitted);
        Ok(emitted)
    }

    /// Live entry for the id, hydrating from the store on a miss.
    fn entry(&self, id: &ConversationId) -> Option<Arc<Mutex<Conversation>>> {
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = live.get(id) {
            return Some(entry.clone());
        }
        let entry = self.hydrate(id)?;
        live.insert(id.clone(), entry.clone());
        Some(entry)
    }

    fn hydrate(&self, id: &ConversationId) -> Option<Arc<Mutex<Conversation>>> {
        let events = self.store.load(id);
        if events.is_empty() {
            return None;
        }
        match Conversation::replay(events) {
            Ok(conversation) => Some(Arc::new(Mutex::new(
                conversation.with_confidence_threshold(self.confidence_threshold),
            ))),
            Err(e) => {
                warn!(conversation_id = %id, error = %e, "Stored event list failed to replay");
                None
            }
        }
    }
}
