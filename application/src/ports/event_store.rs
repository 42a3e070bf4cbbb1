//! Event store port.
//!
//! Every event emitted by a conversation aggregate is handed to an external
//! durable log keyed by conversation id, in emission order. The aggregate
//! assumes nothing about the storage technology — only append-and-replay
//! semantics.
//!
//! `append` is synchronous and non-fallible by design, matching the audit
//! logger discipline: a store that can fail should absorb and report its own
//! failures rather than disrupt the command path. Durable implementations
//! with meaningful failure modes belong behind a write-ahead adapter.

use switchboard_domain::conversation::{ConversationEvent, ConversationId};

/// Port for the durable, append-only conversation event log.
pub trait EventStore: Send + Sync {
    /// Append events for a conversation, in emission order.
    fn append(&self, conversation_id: &ConversationId, events: &[ConversationEvent]);

    /// Load the full event list for a conversation.
    ///
    /// Returns an empty list for unknown ids.
    fn load(&self, conversation_id: &ConversationId) -> Vec<ConversationEvent>;
}
