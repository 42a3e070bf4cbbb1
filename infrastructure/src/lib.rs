//! Infrastructure layer for switchboard
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, including configuration file loading.

pub mod cache;
pub mod config;
pub mod intent;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use cache::InMemoryResultCache;
pub use config::{ConfigLoader, FileAuditConfig, FileConfig, FileOrchestratorConfig};
pub use intent::KeywordIntentExtractor;
pub use logging::JsonlAuditLogger;
pub use store::InMemoryEventStore;
