//! Configuration file loading

pub mod file_config;
pub mod loader;

pub use file_config::{FileAuditConfig, FileConfig, FileOrchestratorConfig};
pub use loader::ConfigLoader;
