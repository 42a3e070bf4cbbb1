//! Protocol server — request dispatch over the tool registry.
//!
//! The [`ProtocolServer`] accepts an [`InvocationRequest`] and returns an
//! [`InvocationResponse`]. Discovery verbs (`initialize`, `list-tools`,
//! `list-prompts`) always succeed; `call-tool` is the critical path:
//!
//! ```text
//! call-tool
//!   ├─ resolve tool            → TOOL_NOT_FOUND
//!   ├─ validate input schema   → INVALID_INPUT (handler never runs)
//!   ├─ authorization check     → UNAUTHORIZED
//!   ├─ cache lookup            → hit: return with cache_hit = true
//!   ├─ execute (bounded)       → EXECUTION_FAILED on error or timeout
//!   ├─ check output schema     (best effort, warn only)
//!   ├─ cache store             (cacheable tools, successful results only)
//!   └─ conversation append     (ToolExecuted, when an id is present)
//! ```
//!
//! Nothing here retries — retry policy belongs to the caller. Failures cross
//! the boundary as structured responses, never as panics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use switchboard_domain::conversation::ConversationId;
use switchboard_domain::protocol::{
    InvocationMethod, InvocationRequest, InvocationResponse, PromptTemplate,
};
use switchboard_domain::tool::registry::{RegisteredTool, ToolRegistry};
use switchboard_domain::tool::value_objects::ToolError;

use crate::conversation::service::ConversationService;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::authorizer::{AuthorizerPort, PresenceAuthorizer};
use crate::ports::result_cache::{CacheKey, NoResultCache, ResultCache};

use super::prompts;

/// Version advertised by `initialize`
pub const PROTOCOL_VERSION: &str = "1.0";

/// Longest result excerpt recorded in a `ToolExecuted` event
const RESULT_SUMMARY_MAX: usize = 200;

/// Dispatches invocation requests against a tool registry.
pub struct ProtocolServer {
    registry: Arc<ToolRegistry>,
    cache: Arc<dyn ResultCache>,
    authorizer: Arc<dyn AuthorizerPort>,
    conversations: Option<Arc<ConversationService>>,
    audit: Arc<dyn AuditLogger>,
    call_timeout: Option<Duration>,
}

impl ProtocolServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            cache: Arc::new(NoResultCache),
            authorizer: Arc::new(PresenceAuthorizer),
            conversations: None,
            audit: Arc::new(NoAuditLogger),
            call_timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Use a real result cache (default: no caching).
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a specific authorizer (default: any non-empty user id resolves).
    pub fn with_authorizer(mut self, authorizer: Arc<dyn AuthorizerPort>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Append `ToolExecuted` events through this conversation service.
    pub fn with_conversations(mut self, conversations: Arc<ConversationService>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    /// Emit audit records through this logger (default: discard).
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Bound tool execution time (default 30s; `None` disables the bound).
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Dispatch one request.
    pub async fn handle(&self, request: &InvocationRequest) -> InvocationResponse {
        match request.method {
            InvocationMethod::Initialize => self.handle_initialize(),
            InvocationMethod::ListTools => self.handle_list_tools(),
            InvocationMethod::ListPrompts => self.handle_list_prompts(),
            InvocationMethod::CallTool => self.handle_call_tool(request).await,
        }
    }

    // ==================== Discovery verbs ====================

    fn handle_initialize(&self) -> InvocationResponse {
        let all_methods = InvocationMethod::all();
        let methods: Vec<&str> = all_methods.iter().map(|m| m.as_str()).collect();
        InvocationResponse::success(serde_json::json!({
            "protocol_version": PROTOCOL_VERSION,
            "server": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "methods": methods,
        }))
    }

    fn handle_list_tools(&self) -> InvocationResponse {
        let tools: Vec<serde_json::Value> = self
            .registry
            .list()
            .into_iter()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name,
                    "description": tool.description,
                    "category": tool.category.as_str(),
                    "capabilities": tool.capabilities,
                    "input_schema": tool.input_schema.to_json(),
                    "output_schema": tool.output_schema.to_json(),
                })
            })
            .collect();
        InvocationResponse::success(serde_json::json!({ "tools": tools }))
    }

    fn handle_list_prompts(&self) -> InvocationResponse {
        let prompts: Vec<PromptTemplate> = prompts::catalog(&self.registry);
        InvocationResponse::success(serde_json::json!({ "prompts": prompts }))
    }

    // ==================== call-tool ====================

    async fn handle_call_tool(&self, request: &InvocationRequest) -> InvocationResponse {
        let Some(tool_name) = request.tool_name.as_deref() else {
            return InvocationResponse::failure(ToolError::invalid_input(
                "call-tool requires a tool name",
            ));
        };

        let Some(tool) = self.registry.get(tool_name) else {
            return InvocationResponse::failure(ToolError::tool_not_found(tool_name));
        };

        if let Err(violation) = tool.definition.input_schema.validate(&request.arguments) {
            return InvocationResponse::failure(ToolError::invalid_input(violation.to_string()));
        }

        if tool.definition.requires_auth {
            let resolved = request
                .user_id
                .as_deref()
                .is_some_and(|id| self.authorizer.resolve(id));
            if !resolved {
                return InvocationResponse::failure(ToolError::unauthorized(tool_name));
            }
        }

        let cache_key = CacheKey::new(
            tool_name,
            &request.arguments,
            request.conversation_id.as_deref(),
        );
        if tool.definition.cacheable
            && let Some(value) = self.cache.get(&cache_key)
        {
            debug!(tool = tool_name, "Serving tool result from cache");
            self.audit_invocation(request, tool_name, true, true, 0);
            return InvocationResponse::success(value).cache_hit();
        }

        let started = Instant::now();
        let executed = match self.call_timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, tool.handler.execute(&request.arguments)).await
                {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(tool = tool_name, timeout_ms = timeout.as_millis() as u64,
                            "Tool execution timed out");
                        self.audit_invocation(request, tool_name, false, false,
                            started.elapsed().as_millis() as u64);
                        return InvocationResponse::failure(ToolError::timeout());
                    }
                }
            }
            None => tool.handler.execute(&request.arguments).await,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match executed {
            Ok(value) => {
                self.check_output(tool, &value);

                if tool.definition.cacheable {
                    self.cache.set(
                        cache_key,
                        value.clone(),
                        Duration::from_secs(tool.definition.cache_ttl_secs),
                    );
                }

                self.append_tool_event(request, tool_name, &value.to_string(), duration_ms, true);
                self.audit_invocation(request, tool_name, true, false, duration_ms);
                InvocationResponse::success(value).with_duration(duration_ms)
            }
            Err(error) => {
                self.append_tool_event(request, tool_name, &error.to_string(), duration_ms, false);
                self.audit_invocation(request, tool_name, false, false, duration_ms);
                InvocationResponse::failure(error).with_duration(duration_ms)
            }
        }
    }

    /// Output schemas are advisory: tool authors own output correctness, so
    /// mismatches are logged, not fatal.
    fn check_output(&self, tool: &RegisteredTool, value: &serde_json::Value) {
        if tool.definition.output_schema.properties().is_empty() {
            return;
        }
        let Some(object) = value.as_object() else {
            warn!(tool = %tool.definition.name, "Tool output is not an object; skipping schema check");
            return;
        };
        let arguments = object
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<std::collections::HashMap<_, _>>();
        if let Err(violation) = tool.definition.output_schema.validate(&arguments) {
            warn!(
                tool = %tool.definition.name,
                violation = %violation,
                "Tool output violates its declared schema"
            );
        }
    }

    fn append_tool_event(
        &self,
        request: &InvocationRequest,
        tool_name: &str,
        result: &str,
        duration_ms: u64,
        success: bool,
    ) {
        let (Some(conversations), Some(conversation_id)) =
            (&self.conversations, request.conversation_id.as_deref())
        else {
            return;
        };

        let id = ConversationId::from(conversation_id);
        let appended = conversations.record_tool_execution(
            &id,
            tool_name,
            request.arguments.clone(),
            truncate(result, RESULT_SUMMARY_MAX),
            duration_ms,
            success,
        );
        if appended.is_err() {
            debug!(
                conversation_id,
                tool = tool_name,
                "No active conversation for tool event; skipping append"
            );
        }
    }

    fn audit_invocation(
        &self,
        request: &InvocationRequest,
        tool_name: &str,
        success: bool,
        cache_hit: bool,
        duration_ms: u64,
    ) {
        self.audit.log(AuditEvent::new(
            "tool_invoked",
            serde_json::json!({
                "tool": tool_name,
                "success": success,
                "cache_hit": cache_hit,
                "duration_ms": duration_ms,
                "conversation_id": request.conversation_id,
                "user_id": request.user_id,
            }),
        ));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
