//! Process Query use case — the top-level orchestrator.
//!
//! Wires the pipeline end to end: ensure conversation → extract intent →
//! record the routing decision (the aggregate auto-escalates when the
//! extractor's confidence is low) → route → execute the selected agents
//! concurrently → compose → stamp timing.
//!
//! A failing agent never aborts the request: its result is omitted and
//! composition degrades to fewer inputs, or to the fixed fallback when every
//! agent fails.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use switchboard_domain::agent::entities::AgentResult;
use switchboard_domain::agent::provider::AgentContext;
use switchboard_domain::agent::router::AgentRouter;
use switchboard_domain::compose::{ComposedResponse, ResponseComposer};
use switchboard_domain::conversation::ConversationId;
use switchboard_domain::core::query::Query;

use crate::conversation::service::ConversationService;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::intent_extractor::{IntentExtractorPort, PassthroughIntentExtractor};

/// Errors that can occur while processing a query.
#[derive(Error, Debug)]
pub enum ProcessQueryError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Input for the [`ProcessQueryUseCase`].
#[derive(Debug, Clone)]
pub struct ProcessQueryInput {
    /// The raw request text.
    pub query: String,
    /// Caller identity, when known.
    pub user_id: Option<String>,
    /// Existing conversation to continue; a fresh id is generated otherwise.
    pub conversation_id: Option<String>,
}

impl ProcessQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: None,
            conversation_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

/// Use case for processing one request through the full pipeline.
pub struct ProcessQueryUseCase {
    router: Arc<AgentRouter>,
    composer: ResponseComposer,
    conversations: Arc<ConversationService>,
    intent: Arc<dyn IntentExtractorPort>,
    audit: Arc<dyn AuditLogger>,
}

impl ProcessQueryUseCase {
    pub fn new(router: Arc<AgentRouter>, conversations: Arc<ConversationService>) -> Self {
        Self {
            router,
            composer: ResponseComposer::new(),
            conversations,
            intent: Arc::new(PassthroughIntentExtractor),
            audit: Arc::new(NoAuditLogger),
        }
    }

    /// Use a real intent engine (default: passthrough).
    pub fn with_intent_extractor(mut self, intent: Arc<dyn IntentExtractorPort>) -> Self {
        self.intent = intent;
        self
    }

    /// Emit audit records through this logger (default: discard).
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Diagnostics: the score of every registered agent for a query.
    pub fn agent_scores(&self, query: &Query) -> HashMap<String, f64> {
        self.router.agent_scores(query)
    }

    /// Process one request and return the composed response.
    pub async fn execute(
        &self,
        input: ProcessQueryInput,
    ) -> Result<ComposedResponse, ProcessQueryError> {
        let started = Instant::now();
        let query = Query::try_new(input.query.as_str())
            .ok_or_else(|| ProcessQueryError::InvalidQuery("query is empty".to_string()))?;

        let conversation_id = ConversationId::from(
            input
                .conversation_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        );
        self.conversations.start_conversation(
            &conversation_id,
            "orchestrator",
            input.user_id.clone(),
            HashMap::from([("query".to_string(), serde_json::json!(query.content()))]),
        );

        let extraction = self.intent.process_query(query.content()).await;
        debug!(
            intent = %extraction.intent,
            confidence = extraction.confidence,
            "Intent extracted"
        );

        let selected = self.router.route(&query);
        let selected_names: Vec<String> =
            selected.iter().map(|a| a.name().to_string()).collect();
        info!(agents = ?selected_names, "Routed query");

        let decision = format!(
            "Route '{}' intent to [{}]",
            extraction.intent,
            selected_names.join(", ")
        );
        if let Err(e) = self.conversations.make_decision(
            &conversation_id,
            decision,
            extraction.explanation.clone(),
            extraction.confidence,
        ) {
            warn!(conversation_id = %conversation_id, error = %e, "Failed to record routing decision");
        }

        let mut context = AgentContext::new()
            .with_conversation_id(conversation_id.as_str())
            .with_metadata("intent", serde_json::json!(extraction.intent))
            .with_metadata(
                "entities",
                serde_json::to_value(&extraction.entities).unwrap_or_default(),
            );
        if let Some(user_id) = &input.user_id {
            context = context.with_user_id(user_id.clone());
        }

        let outcomes = join_all(
            selected
                .iter()
                .map(|agent| agent.execute(&query, &context)),
        )
        .await;

        let results: Vec<AgentResult> = selected_names
            .iter()
            .zip(outcomes)
            .filter_map(|(name, outcome)| match outcome {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(agent = %name, error = %e, "Agent failed; omitting from composition");
                    None
                }
            })
            .collect();

        let response = self
            .composer
            .compose(&results, &query)
            .with_response_time(started.elapsed().as_millis() as u64);

        self.audit.log(AuditEvent::new(
            "query_processed",
            serde_json::json!({
                "message_id": response.message_id,
                "conversation_id": conversation_id.as_str(),
                "agents_used": response.agents_used,
                "tools_used": response.tools_used,
                "confidence": response.confidence,
                "response_time_ms": response.response_time_ms,
            }),
        ));

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use switchboard_domain::agent::entities::TriggerKeyword;
    use switchboard_domain::agent::provider::{Agent, AgentError};
    use switchboard_domain::compose::{FALLBACK_CONFIDENCE, SINGLE_AGENT_CONFIDENCE};
    use switchboard_domain::conversation::ConversationEvent;

    use crate::ports::event_store::EventStore;
    use crate::ports::intent_extractor::IntentExtraction;

    // ==================== Test Mocks ====================

    struct VecEventStore {
        events: Mutex<HashMap<ConversationId, Vec<ConversationEvent>>>,
    }

    impl VecEventStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(HashMap::new()),
            })
        }
    }

    impl EventStore for VecEventStore {
        fn append(&self, conversation_id: &ConversationId, events: &[ConversationEvent]) {
            self.events
                .lock()
                .unwrap()
                .entry(conversation_id.clone())
                .or_default()
                .extend_from_slice(events);
        }

        fn load(&self, conversation_id: &ConversationId) -> Vec<ConversationEvent> {
            self.events
                .lock()
                .unwrap()
                .get(conversation_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    struct StubAgent {
        name: String,
        triggers: Vec<TriggerKeyword>,
        answer: Option<String>,
        tools: Vec<String>,
    }

    impl StubAgent {
        fn answering(name: &str, triggers: Vec<TriggerKeyword>, answer: &str) -> Arc<dyn Agent> {
            Arc::new(Self {
                name: name.to_string(),
                triggers,
                answer: Some(answer.to_string()),
                tools: Vec::new(),
            })
        }

        fn with_tools(
            name: &str,
            triggers: Vec<TriggerKeyword>,
            answer: &str,
            tools: &[&str],
        ) -> Arc<dyn Agent> {
            Arc::new(Self {
                name: name.to_string(),
                triggers,
                answer: Some(answer.to_string()),
                tools: tools.iter().map(|t| t.to_string()).collect(),
            })
        }

        fn failing(name: &str, triggers: Vec<TriggerKeyword>) -> Arc<dyn Agent> {
            Arc::new(Self {
                name: name.to_string(),
                triggers,
                answer: None,
                tools: Vec::new(),
            })
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            &self.name
        }

        fn triggers(&self) -> &[TriggerKeyword] {
            &self.triggers
        }

        async fn execute(
            &self,
            _query: &Query,
            _context: &AgentContext,
        ) -> Result<AgentResult, AgentError> {
            match &self.answer {
                Some(answer) => {
                    let mut result = AgentResult::new(&self.name, answer.clone());
                    for tool in &self.tools {
                        result = result.with_tool_output(tool.clone(), serde_json::json!({}));
                    }
                    Ok(result)
                }
                None => Err(AgentError::ExecutionFailed("stub failure".to_string())),
            }
        }
    }

    struct StaticIntentExtractor {
        extraction: IntentExtraction,
    }

    #[async_trait]
    impl IntentExtractorPort for StaticIntentExtractor {
        async fn process_query(&self, _text: &str) -> IntentExtraction {
            self.extraction.clone()
        }
    }

    fn financial_router() -> Arc<AgentRouter> {
        Arc::new(
            AgentRouter::new()
                .with_agent(StubAgent::with_tools(
                    "financial_advisor",
                    vec![
                        TriggerKeyword::domain("balance"),
                        TriggerKeyword::domain("account"),
                    ],
                    "Your balance is $1,250.00",
                    &["balance_lookup"],
                ))
                .with_agent(StubAgent::answering(
                    "general",
                    vec![],
                    "I can help with general questions.",
                )),
        )
    }

    fn use_case(router: Arc<AgentRouter>) -> (ProcessQueryUseCase, Arc<ConversationService>) {
        let conversations = Arc::new(ConversationService::new(VecEventStore::new()));
        (
            ProcessQueryUseCase::new(router, conversations.clone()),
            conversations,
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_routes_to_best_matching_agent() {
        let (use_case, _) = use_case(financial_router());
        let response = use_case
            .execute(ProcessQueryInput::new("What is my account balance?"))
            .await
            .unwrap();

        assert_eq!(response.agents_used, vec!["financial_advisor"]);
        assert_eq!(response.content, "Your balance is $1,250.00");
        assert_eq!(response.confidence, SINGLE_AGENT_CONFIDENCE);
        assert_eq!(response.tools_used, vec!["balance_lookup"]);
    }

    #[tokio::test]
    async fn test_gibberish_routes_to_fallback() {
        let (use_case, _) = use_case(financial_router());
        let response = use_case
            .execute(ProcessQueryInput::new("xyzzy foobar baz"))
            .await
            .unwrap();

        assert_eq!(response.agents_used, vec!["general"]);
        assert_eq!(response.content, "I can help with general questions.");
    }

    #[tokio::test]
    async fn test_message_id_is_uuid_shaped() {
        let (use_case, _) = use_case(financial_router());
        let response = use_case
            .execute(ProcessQueryInput::new("balance please"))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&response.message_id).is_ok());
    }

    #[tokio::test]
    async fn test_failing_agent_is_omitted() {
        let router = Arc::new(
            AgentRouter::new()
                .with_agent(StubAgent::failing(
                    "broken",
                    vec![TriggerKeyword::domain("balance")],
                ))
                .with_agent(StubAgent::answering(
                    "financial_advisor",
                    vec![TriggerKeyword::domain("balance")],
                    "Balance is $5",
                )),
        );
        let (use_case, _) = use_case(router);

        let response = use_case
            .execute(ProcessQueryInput::new("balance"))
            .await
            .unwrap();

        // Both scored; the failing one degrades away
        assert_eq!(response.agents_used, vec!["financial_advisor"]);
        assert_eq!(response.content, "Balance is $5");
    }

    #[tokio::test]
    async fn test_all_agents_failing_yields_fallback_response() {
        let router = Arc::new(AgentRouter::new().with_agent(StubAgent::failing(
            "broken",
            vec![TriggerKeyword::domain("balance")],
        )));
        let (use_case, _) = use_case(router);

        let response = use_case
            .execute(ProcessQueryInput::new("balance"))
            .await
            .unwrap();

        assert!(response.agents_used.is_empty());
        assert_eq!(response.confidence, FALLBACK_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_multi_agent_composition() {
        let router = Arc::new(
            AgentRouter::new()
                .with_agent(StubAgent::with_tools(
                    "financial_advisor",
                    vec![TriggerKeyword::domain("balance")],
                    "Balance is $10",
                    &["balance_lookup"],
                ))
                .with_agent(StubAgent::with_tools(
                    "compliance_officer",
                    vec![TriggerKeyword::domain("balance")],
                    "No holds",
                    &["compliance_check", "balance_lookup"],
                )),
        );
        let (use_case, _) = use_case(router);

        let response = use_case
            .execute(ProcessQueryInput::new("balance"))
            .await
            .unwrap();

        assert_eq!(response.agents_used.len(), 2);
        assert!(response.is_multi_agent());
        assert_eq!(
            response.tools_used,
            vec!["balance_lookup", "compliance_check"]
        );
    }

    #[tokio::test]
    async fn test_records_decision_and_low_confidence_escalation() {
        let (use_case, conversations) = use_case(financial_router());
        let use_case = use_case.with_intent_extractor(Arc::new(StaticIntentExtractor {
            extraction: IntentExtraction::new("account_inquiry", 0.42)
                .with_explanation("ambiguous phrasing"),
        }));

        use_case
            .execute(
                ProcessQueryInput::new("account balance")
                    .with_conversation_id("conv-1")
                    .with_user_id("user-1"),
            )
            .await
            .unwrap();

        let conversation = conversations.get(&ConversationId::from("conv-1")).unwrap();
        assert_eq!(
            conversation.event_kinds(),
            vec![
                "conversation_started",
                "ai_decision_made",
                "human_intervention_requested",
            ]
        );
        assert_eq!(conversation.user_id(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_high_confidence_does_not_escalate() {
        let (use_case, conversations) = use_case(financial_router());

        use_case
            .execute(ProcessQueryInput::new("account balance").with_conversation_id("conv-1"))
            .await
            .unwrap();

        let conversation = conversations.get(&ConversationId::from("conv-1")).unwrap();
        assert_eq!(
            conversation.event_kinds(),
            vec!["conversation_started", "ai_decision_made"]
        );
    }

    #[tokio::test]
    async fn test_generates_conversation_id_when_absent() {
        let (use_case, _) = use_case(financial_router());
        let response = use_case
            .execute(ProcessQueryInput::new("balance"))
            .await
            .unwrap();
        // No panic, normal response; the generated id is internal
        assert!(!response.message_id.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let (use_case, _) = use_case(financial_router());
        let result = use_case.execute(ProcessQueryInput::new("   ")).await;
        assert!(matches!(result, Err(ProcessQueryError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_agent_scores_diagnostics() {
        let (use_case, _) = use_case(financial_router());
        let scores = use_case.agent_scores(&Query::new("balance"));
        assert_eq!(scores.len(), 2);
        assert!(scores["financial_advisor"] > 0.0);
        assert_eq!(scores["general"], 0.0);
    }
}
