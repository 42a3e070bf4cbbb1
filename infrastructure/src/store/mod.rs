//! Event store adapters

pub mod memory;

pub use memory::InMemoryEventStore;
