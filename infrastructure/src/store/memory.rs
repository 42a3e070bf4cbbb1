//! In-memory event store.
//!
//! Append-only per-conversation vectors behind a mutex. The default adapter
//! for single-process deployments and tests; a durable store implements the
//! same [`EventStore`] port.

use std::collections::HashMap;
use std::sync::Mutex;

use switchboard_application::ports::event_store::EventStore;
use switchboard_domain::conversation::{ConversationEvent, ConversationId};

/// Event store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<HashMap<ConversationId, Vec<ConversationEvent>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with at least one stored event.
    pub fn conversation_count(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, conversation_id: &ConversationId, events: &[ConversationEvent]) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(conversation_id.clone())
            .or_default()
            .extend_from_slice(events);
    }

    fn load(&self, conversation_id: &ConversationId) -> Vec<ConversationEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }
}
