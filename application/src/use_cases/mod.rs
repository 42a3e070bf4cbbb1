//! Use cases

pub mod process_query;

pub use process_query::{ProcessQueryError, ProcessQueryInput, ProcessQueryUseCase};
