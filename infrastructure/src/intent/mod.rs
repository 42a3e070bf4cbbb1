//! Intent extraction adapters

pub mod keyword;

pub use keyword::KeywordIntentExtractor;
