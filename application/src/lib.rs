//! Application layer for switchboard
//!
//! This crate contains the protocol server, the conversation service, use
//! cases, port definitions, and application configuration. It depends only
//! on the domain layer.

pub mod config;
pub mod conversation;
pub mod ports;
pub mod protocol;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorParams;
pub use conversation::ConversationService;
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    authorizer::{AuthorizerPort, DenyAllAuthorizer, PresenceAuthorizer},
    event_store::EventStore,
    intent_extractor::{
        ExtractedEntity, IntentExtraction, IntentExtractorPort, PassthroughIntentExtractor,
    },
    result_cache::{CacheKey, NoResultCache, ResultCache},
};
pub use protocol::{PROTOCOL_VERSION, ProtocolServer};
pub use use_cases::process_query::{ProcessQueryError, ProcessQueryInput, ProcessQueryUseCase};
