//! Live conversation coordination

pub mod service;

pub use service::ConversationService;
