//! Intent extractor port.
//!
//! The natural-language intent/entity engine is an external collaborator.
//! This port treats it as an opaque function from request text to intent,
//! entities, and a confidence score; the orchestrator records that
//! confidence as its routing decision confidence, which is what drives the
//! automatic low-confidence escalation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entity recognized in the request text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Entity kind (e.g. "account_id", "amount")
    pub entity_type: String,
    /// Surface value as extracted
    pub value: String,
}

impl ExtractedEntity {
    pub fn new(entity_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
        }
    }
}

/// Output of the intent engine for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentExtraction {
    /// Recognized intent label
    pub intent: String,
    /// Recognized entities
    pub entities: Vec<ExtractedEntity>,
    /// Engine confidence in [0, 1]
    pub confidence: f64,
    /// Human-readable explanation of the extraction
    pub explanation: String,
}

impl IntentExtraction {
    pub fn new(intent: impl Into<String>, confidence: f64) -> Self {
        Self {
            intent: intent.into(),
            entities: Vec::new(),
            confidence: confidence.clamp(0.0, 1.0),
            explanation: String::new(),
        }
    }

    pub fn with_entity(mut self, entity: ExtractedEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// Port for the opaque intent/entity extraction engine.
#[async_trait]
pub trait IntentExtractorPort: Send + Sync {
    /// Extract intent and entities from raw request text.
    async fn process_query(&self, text: &str) -> IntentExtraction;
}

/// Extractor that recognizes nothing, with full confidence.
///
/// Used when no engine is wired: routing then rests entirely on agent
/// keyword scores, and the constant confidence keeps the escalation rule
/// quiet.
pub struct PassthroughIntentExtractor;

#[async_trait]
impl IntentExtractorPort for PassthroughIntentExtractor {
    async fn process_query(&self, _text: &str) -> IntentExtraction {
        IntentExtraction::new("general", 1.0).with_explanation("intent extraction disabled")
    }
}
