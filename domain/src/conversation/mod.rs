//! Conversation domain module — the event-sourced audit unit.
//!
//! A **Conversation** groups every decision, tool execution, and escalation
//! for one interaction session as an append-only list of immutable events.
//! State is never stored directly: it is always derivable by folding the
//! event list from the start, which is what makes the log replayable.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | [`ConversationStarted`](ConversationEvent::ConversationStarted) | [`Conversation::start`] |
//! | [`AiDecisionMade`](ConversationEvent::AiDecisionMade) | [`Conversation::make_decision`] |
//! | [`ToolExecuted`](ConversationEvent::ToolExecuted) | [`Conversation::record_tool_execution`] |
//! | [`HumanInterventionRequested`](ConversationEvent::HumanInterventionRequested) | low-confidence rule, [`Conversation::request_human_intervention`], [`Conversation::record_human_override`] |
//!
//! # Low-confidence escalation
//!
//! A decision below the confidence threshold (default
//! [`DEFAULT_CONFIDENCE_THRESHOLD`]) emits an automatic
//! `HumanInterventionRequested` event **inside the same command**, before
//! control returns. The escalation therefore always immediately follows its
//! triggering decision in the log — no listener, no interleaving window.
//!
//! # Examples
//!
//! ```
//! use switchboard_domain::conversation::{Conversation, ConversationId};
//! use std::collections::HashMap;
//!
//! let mut conversation = Conversation::start(
//!     ConversationId::from("conv-1"),
//!     "orchestrator",
//!     Some("user-1".to_string()),
//!     HashMap::new(),
//! );
//! let emitted = conversation.make_decision("route to advisor", "keyword match", 0.45);
//! assert_eq!(emitted.len(), 2); // decision + automatic escalation
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Confidence threshold below which decisions auto-escalate
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Reason recorded on automatic low-confidence escalations
pub const LOW_CONFIDENCE_REASON: &str = "Low confidence decision";

// =============================================================================
// ConversationId
// =============================================================================

/// Unique identifier for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Events
// =============================================================================

/// How a human intervention was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    /// Raised automatically by the low-confidence rule
    LowConfidence,
    /// Raised explicitly by a caller
    InterventionRequired,
    /// A human overrode an AI decision
    Override,
}

impl InterventionType {
    pub fn as_str(&self) -> &str {
        match self {
            InterventionType::LowConfidence => "low_confidence",
            InterventionType::InterventionRequired => "intervention_required",
            InterventionType::Override => "override",
        }
    }
}

impl std::fmt::Display for InterventionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable fact recorded in a conversation's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    ConversationStarted {
        conversation_id: ConversationId,
        agent_type: String,
        user_id: Option<String>,
        context: HashMap<String, serde_json::Value>,
        occurred_at: DateTime<Utc>,
    },
    AiDecisionMade {
        decision: String,
        reasoning: String,
        confidence: f64,
        occurred_at: DateTime<Utc>,
    },
    ToolExecuted {
        tool: String,
        params: HashMap<String, serde_json::Value>,
        result: String,
        duration_ms: u64,
        success: bool,
        occurred_at: DateTime<Utc>,
    },
    HumanInterventionRequested {
        reason: String,
        context: HashMap<String, serde_json::Value>,
        suggested_action: Option<String>,
        intervention_type: InterventionType,
        occurred_at: DateTime<Utc>,
    },
}

impl ConversationEvent {
    /// The event's type tag, matching its serialized `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            ConversationEvent::ConversationStarted { .. } => "conversation_started",
            ConversationEvent::AiDecisionMade { .. } => "ai_decision_made",
            ConversationEvent::ToolExecuted { .. } => "tool_executed",
            ConversationEvent::HumanInterventionRequested { .. } => {
                "human_intervention_requested"
            }
        }
    }
}

// =============================================================================
// Replay errors
// =============================================================================

/// Error returned when folding a stored event list fails
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Cannot replay an empty event list")]
    Empty,

    #[error("First event must be conversation_started, got {0}")]
    MissingStart(String),
}

// =============================================================================
// Conversation aggregate
// =============================================================================

/// The event-sourced aggregate root for one interaction session.
///
/// All mutation happens through command methods that record events; derived
/// state is maintained by the pure [`apply`](Self::apply) fold so a replayed
/// conversation is indistinguishable from the live one.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    agent_type: String,
    user_id: Option<String>,
    context: HashMap<String, serde_json::Value>,
    events: Vec<ConversationEvent>,
    confidence_threshold: f64,
    decision_count: usize,
    tool_execution_count: usize,
    pending_intervention: bool,
}

impl Conversation {
    /// Start a new conversation, recording the initial event.
    pub fn start(
        id: ConversationId,
        agent_type: impl Into<String>,
        user_id: Option<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        let mut conversation = Self::empty();
        conversation.record(ConversationEvent::ConversationStarted {
            conversation_id: id,
            agent_type: agent_type.into(),
            user_id,
            context,
            occurred_at: Utc::now(),
        });
        conversation
    }

    /// Override the auto-escalation threshold (default 0.8)
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Record an AI decision.
    ///
    /// When `confidence` is below the threshold, the automatic
    /// `HumanInterventionRequested` event is recorded before this method
    /// returns. Returns the newly recorded events in order.
    pub fn make_decision(
        &mut self,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        confidence: f64,
    ) -> Vec<ConversationEvent> {
        let decision = decision.into();
        let mut emitted = vec![self.record(ConversationEvent::AiDecisionMade {
            decision: decision.clone(),
            reasoning: reasoning.into(),
            confidence,
            occurred_at: Utc::now(),
        })];

        if confidence < self.confidence_threshold {
            let context = HashMap::from([
                ("decision".to_string(), serde_json::json!(decision)),
                ("confidence".to_string(), serde_json::json!(confidence)),
            ]);
            emitted.push(self.record(ConversationEvent::HumanInterventionRequested {
                reason: LOW_CONFIDENCE_REASON.to_string(),
                context,
                suggested_action: None,
                intervention_type: InterventionType::LowConfidence,
                occurred_at: Utc::now(),
            }));
        }

        emitted
    }

    /// Record a tool execution outcome
    pub fn record_tool_execution(
        &mut self,
        tool: impl Into<String>,
        params: HashMap<String, serde_json::Value>,
        result: impl Into<String>,
        duration_ms: u64,
        success: bool,
    ) -> Vec<ConversationEvent> {
        vec![self.record(ConversationEvent::ToolExecuted {
            tool: tool.into(),
            params,
            result: result.into(),
            duration_ms,
            success,
            occurred_at: Utc::now(),
        })]
    }

    /// Explicitly escalate to a human
    pub fn request_human_intervention(
        &mut self,
        reason: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Vec<ConversationEvent> {
        vec![self.record(ConversationEvent::HumanInterventionRequested {
            reason: reason.into(),
            context,
            suggested_action: None,
            intervention_type: InterventionType::InterventionRequired,
            occurred_at: Utc::now(),
        })]
    }

    /// Record a human overriding an AI decision
    pub fn record_human_override(
        &mut self,
        original: impl Into<String>,
        overridden: impl Into<String>,
        reason: impl Into<String>,
    ) -> Vec<ConversationEvent> {
        let overridden = overridden.into();
        let context = HashMap::from([
            (
                "original_decision".to_string(),
                serde_json::json!(original.into()),
            ),
            (
                "overridden_decision".to_string(),
                serde_json::json!(overridden.clone()),
            ),
        ]);
        vec![self.record(ConversationEvent::HumanInterventionRequested {
            reason: reason.into(),
            context,
            suggested_action: Some(overridden),
            intervention_type: InterventionType::Override,
            occurred_at: Utc::now(),
        })]
    }

    /// Rebuild a conversation by folding a stored event list.
    ///
    /// The result's applied-event list equals the input exactly; this is the
    /// replay-consistency property the audit log depends on.
    pub fn replay(events: Vec<ConversationEvent>) -> Result<Self, ReplayError> {
        let first = events.first().ok_or(ReplayError::Empty)?;
        if !matches!(first, ConversationEvent::ConversationStarted { .. }) {
            return Err(ReplayError::MissingStart(first.kind().to_string()));
        }

        let mut conversation = Self::empty();
        for event in events {
            conversation.record(event);
        }
        Ok(conversation)
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn context(&self) -> &HashMap<String, serde_json::Value> {
        &self.context
    }

    /// The full applied-event list, in occurrence order
    pub fn events(&self) -> &[ConversationEvent] {
        &self.events
    }

    /// Event type tags in order (convenient for assertions and summaries)
    pub fn event_kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind()).collect()
    }

    pub fn decision_count(&self) -> usize {
        self.decision_count
    }

    pub fn tool_execution_count(&self) -> usize {
        self.tool_execution_count
    }

    /// Whether any intervention has been requested and not yet acted on
    pub fn pending_intervention(&self) -> bool {
        self.pending_intervention
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    // ==================== Internals ====================

    fn empty() -> Self {
        Self {
            id: ConversationId::new(""),
            agent_type: String::new(),
            user_id: None,
            context: HashMap::new(),
            events: Vec::new(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            decision_count: 0,
            tool_execution_count: 0,
            pending_intervention: false,
        }
    }

    /// Apply then append. Returns a clone of the recorded event so commands
    /// can hand emitted events to the caller in order.
    fn record(&mut self, event: ConversationEvent) -> ConversationEvent {
        self.apply(&event);
        self.events.push(event.clone());
        event
    }

    /// Pure state fold. Must stay deterministic and side-effect free —
    /// replay equality depends on it.
    fn apply(&mut self, event: &ConversationEvent) {
        match event {
            ConversationEvent::ConversationStarted {
                conversation_id,
                agent_type,
                user_id,
                context,
                ..
            } => {
                self.id = conversation_id.clone();
                self.agent_type = agent_type.clone();
                self.user_id = user_id.clone();
                self.context = context.clone();
            }
            ConversationEvent::AiDecisionMade { .. } => {
                self.decision_count += 1;
            }
            ConversationEvent::ToolExecuted { .. } => {
                self.tool_execution_count += 1;
            }
            ConversationEvent::HumanInterventionRequested { .. } => {
                self.pending_intervention = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Conversation {
        Conversation::start(
            ConversationId::from("conv-1"),
            "orchestrator",
            Some("user-1".to_string()),
            HashMap::from([("channel".to_string(), serde_json::json!("chat"))]),
        )
    }

    // =========================================================================
    // Start
    // =========================================================================

    #[test]
    fn test_start_records_initial_event() {
        let conversation = started();

        assert_eq!(conversation.id().as_str(), "conv-1");
        assert_eq!(conversation.agent_type(), "orchestrator");
        assert_eq!(conversation.user_id(), Some("user-1"));
        assert_eq!(conversation.context()["channel"], serde_json::json!("chat"));
        assert_eq!(
            conversation.confidence_threshold(),
            DEFAULT_CONFIDENCE_THRESHOLD
        );
        assert_eq!(conversation.event_kinds(), vec!["conversation_started"]);
    }

    // =========================================================================
    // Decisions and the low-confidence rule
    // =========================================================================

    #[test]
    fn test_high_confidence_decision_emits_one_event() {
        let mut conversation = started();
        let emitted = conversation.make_decision("route to advisor", "strong match", 0.92);

        assert_eq!(emitted.len(), 1);
        assert_eq!(
            conversation.event_kinds(),
            vec!["conversation_started", "ai_decision_made"]
        );
        assert!(!conversation.pending_intervention());
        assert_eq!(conversation.decision_count(), 1);
    }

    #[test]
    fn test_low_confidence_decision_auto_escalates() {
        let mut conversation = started();
        let emitted = conversation.make_decision("route to advisor", "weak match", 0.45);

        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].kind(), "ai_decision_made");
        assert_eq!(emitted[1].kind(), "human_intervention_requested");

        let ConversationEvent::HumanInterventionRequested {
            reason,
            context,
            intervention_type,
            suggested_action,
            ..
        } = &emitted[1]
        else {
            panic!("expected escalation event");
        };
        assert_eq!(reason, LOW_CONFIDENCE_REASON);
        assert_eq!(*intervention_type, InterventionType::LowConfidence);
        assert_eq!(context["decision"], serde_json::json!("route to advisor"));
        assert_eq!(context["confidence"], serde_json::json!(0.45));
        assert!(suggested_action.is_none());
        assert!(conversation.pending_intervention());
    }

    #[test]
    fn test_threshold_boundary_does_not_escalate() {
        let mut conversation = started();
        // Exactly at the threshold is not "below"
        let emitted =
            conversation.make_decision("borderline", "exact", DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let mut conversation = started().with_confidence_threshold(0.5);
        assert_eq!(conversation.make_decision("a", "r", 0.6).len(), 1);
        assert_eq!(conversation.make_decision("b", "r", 0.4).len(), 2);
    }

    // =========================================================================
    // Tool executions
    // =========================================================================

    #[test]
    fn test_record_tool_execution() {
        let mut conversation = started();
        let params = HashMap::from([("account_id".to_string(), serde_json::json!("acc-1"))]);
        let emitted =
            conversation.record_tool_execution("balance_lookup", params, "balance: 10", 12, true);

        assert_eq!(emitted.len(), 1);
        assert_eq!(conversation.tool_execution_count(), 1);

        let ConversationEvent::ToolExecuted {
            tool,
            duration_ms,
            success,
            ..
        } = &emitted[0]
        else {
            panic!("expected tool event");
        };
        assert_eq!(tool, "balance_lookup");
        assert_eq!(*duration_ms, 12);
        assert!(success);
    }

    // =========================================================================
    // Escalations
    // =========================================================================

    #[test]
    fn test_manual_intervention_type() {
        let mut conversation = started();
        let emitted = conversation
            .request_human_intervention("customer asked for a human", HashMap::new());

        let ConversationEvent::HumanInterventionRequested {
            intervention_type, ..
        } = &emitted[0]
        else {
            panic!("expected escalation event");
        };
        assert_eq!(*intervention_type, InterventionType::InterventionRequired);
        assert_eq!(intervention_type.as_str(), "intervention_required");
        assert_eq!(InterventionType::LowConfidence.to_string(), "low_confidence");
        assert_eq!(InterventionType::Override.to_string(), "override");
    }

    #[test]
    fn test_human_override_carries_both_decisions() {
        let mut conversation = started();
        let emitted =
            conversation.record_human_override("approve transfer", "hold transfer", "fraud flag");

        let ConversationEvent::HumanInterventionRequested {
            context,
            suggested_action,
            intervention_type,
            ..
        } = &emitted[0]
        else {
            panic!("expected escalation event");
        };
        assert_eq!(*intervention_type, InterventionType::Override);
        assert_eq!(
            context["original_decision"],
            serde_json::json!("approve transfer")
        );
        assert_eq!(
            context["overridden_decision"],
            serde_json::json!("hold transfer")
        );
        assert_eq!(suggested_action.as_deref(), Some("hold transfer"));
    }

    // =========================================================================
    // Replay
    // =========================================================================

    #[test]
    fn test_replay_reproduces_event_list_exactly() {
        let mut live = started();
        live.make_decision("route to advisor", "strong match", 0.92);
        live.record_tool_execution("balance_lookup", HashMap::new(), "ok", 7, true);
        live.make_decision("retry with fallback", "weak match", 0.45);

        let replayed = Conversation::replay(live.events().to_vec()).unwrap();

        assert_eq!(replayed.events(), live.events());
        assert_eq!(
            replayed.event_kinds(),
            vec![
                "conversation_started",
                "ai_decision_made",
                "tool_executed",
                "ai_decision_made",
                "human_intervention_requested",
            ]
        );
        assert_eq!(replayed.id(), live.id());
        assert_eq!(replayed.decision_count(), live.decision_count());
        assert_eq!(replayed.tool_execution_count(), live.tool_execution_count());
        assert_eq!(replayed.pending_intervention(), live.pending_intervention());
    }

    #[test]
    fn test_replay_empty_fails() {
        assert_eq!(Conversation::replay(Vec::new()).unwrap_err(), ReplayError::Empty);
    }

    #[test]
    fn test_replay_requires_start_first() {
        let events = vec![ConversationEvent::AiDecisionMade {
            decision: "d".to_string(),
            reasoning: "r".to_string(),
            confidence: 0.9,
            occurred_at: Utc::now(),
        }];
        let err = Conversation::replay(events).unwrap_err();
        assert_eq!(err, ReplayError::MissingStart("ai_decision_made".to_string()));
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_event_serde_roundtrip() {
        let mut conversation = started();
        conversation.make_decision("d", "r", 0.3);
        conversation.record_tool_execution("t", HashMap::new(), "ok", 1, true);

        for event in conversation.events() {
            let json = serde_json::to_string(event).unwrap();
            let back: ConversationEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, event);

            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["type"], event.kind());
        }
    }
}
