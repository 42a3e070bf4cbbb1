//! Keyword intent extractor.
//!
//! Table-driven adapter for the intent extractor port. The production intent
//! engine is an external collaborator; this adapter covers development and
//! test setups with a keyword table and a coarse confidence heuristic:
//! the confidence grows with the number of matched keywords and bottoms out
//! at [`UNMATCHED_CONFIDENCE`] when nothing matches.

use async_trait::async_trait;

use switchboard_application::ports::intent_extractor::{IntentExtraction, IntentExtractorPort};

/// Confidence reported when no rule matches
pub const UNMATCHED_CONFIDENCE: f64 = 0.4;
/// Confidence for a single-keyword match
const BASE_CONFIDENCE: f64 = 0.7;
/// Added per additional matched keyword, up to 1.0
const PER_KEYWORD_BONUS: f64 = 0.1;

struct IntentRule {
    intent: &'static str,
    keywords: Vec<&'static str>,
}

/// Intent extractor over a fixed keyword table.
pub struct KeywordIntentExtractor {
    rules: Vec<IntentRule>,
}

impl KeywordIntentExtractor {
    /// Extractor with an empty table: everything is "unknown".
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule mapping keywords to an intent label.
    pub fn with_intent(mut self, intent: &'static str, keywords: &[&'static str]) -> Self {
        self.rules.push(IntentRule {
            intent,
            keywords: keywords.to_vec(),
        });
        self
    }
}

impl Default for KeywordIntentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentExtractorPort for KeywordIntentExtractor {
    async fn process_query(&self, text: &str) -> IntentExtraction {
        let normalized = text.to_lowercase();

        let best = self
            .rules
            .iter()
            .map(|rule| {
                let matched: Vec<&str> = rule
                    .keywords
                    .iter()
                    .copied()
                    .filter(|kw| normalized.contains(kw))
                    .collect();
                (rule, matched)
            })
            .max_by_key(|(_, matched)| matched.len());

        match best {
            Some((rule, matched)) if !matched.is_empty() => {
                let confidence =
                    BASE_CONFIDENCE + PER_KEYWORD_BONUS * (matched.len() as f64 - 1.0);
                IntentExtraction::new(rule.intent, confidence).with_explanation(format!(
                    "matched keywords: {}",
                    matched.join(", ")
                ))
            }
            _ => IntentExtraction::new("unknown", UNMATCHED_CONFIDENCE)
                .with_explanation("no keyword rule matched"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordIntentExtractor {
        KeywordIntentExtractor::new()
            .with_intent("account_inquiry", &["balance", "account", "statement"])
            .with_intent("transfer", &["transfer", "send", "wire"])
    }

    #[tokio::test]
    async fn test_matches_best_rule() {
        let extraction = extractor()
            .process_query("What is my account balance?")
            .await;
        assert_eq!(extraction.intent, "account_inquiry");
        // Two keywords matched: base + one bonus
        assert!((extraction.confidence - 0.8).abs() < 1e-9);
        assert!(extraction.explanation.contains("balance"));
    }

    #[tokio::test]
    async fn test_single_keyword_confidence() {
        let extraction = extractor().process_query("wire something").await;
        assert_eq!(extraction.intent, "transfer");
        assert!((extraction.confidence - BASE_CONFIDENCE).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unmatched_query() {
        let extraction = extractor().process_query("xyzzy foobar baz").await;
        assert_eq!(extraction.intent, "unknown");
        assert_eq!(extraction.confidence, UNMATCHED_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let extraction = KeywordIntentExtractor::new().process_query("anything").await;
        assert_eq!(extraction.intent, "unknown");
    }
}
