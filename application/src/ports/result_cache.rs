//! Result cache port.
//!
//! The tool-result cache is keyed by (tool name, normalized arguments,
//! conversation id) with a per-tool TTL. The port keeps the cache behind an
//! explicit get/set/invalidate interface so call sites are identical whether
//! the adapter is an in-memory map (tests, single process) or a distributed
//! store.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::time::Duration;

/// Composite cache key.
///
/// Arguments are normalized by serializing them with sorted keys, so two
/// argument maps with the same entries in different insertion orders hit the
/// same slot. Requests without a conversation id share one anonymous scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    tool: String,
    arguments: String,
    conversation: String,
}

impl CacheKey {
    pub fn new(
        tool: impl Into<String>,
        arguments: &HashMap<String, serde_json::Value>,
        conversation_id: Option<&str>,
    ) -> Self {
        let sorted: BTreeMap<&String, &serde_json::Value> = arguments.iter().collect();
        Self {
            tool: tool.into(),
            arguments: serde_json::to_string(&sorted).unwrap_or_default(),
            conversation: conversation_id.unwrap_or("").to_string(),
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }
}

/// Port for the shared tool-result cache.
///
/// Writes are last-writer-wins; a read racing a write for the same key may
/// return either value but never a torn one (atomic entry replacement).
pub trait ResultCache: Send + Sync {
    /// Get a cached value if present and fresh.
    fn get(&self, key: &CacheKey) -> Option<serde_json::Value>;

    /// Store a value under the key for `ttl`.
    fn set(&self, key: CacheKey, value: serde_json::Value, ttl: Duration);

    /// Drop the entry for the key, if any.
    fn invalidate(&self, key: &CacheKey);
}

/// Cache that stores nothing, for uncached setups and tests.
pub struct NoResultCache;

impl ResultCache for NoResultCache {
    fn get(&self, _key: &CacheKey) -> Option<serde_json::Value> {
        None
    }

    fn set(&self, _key: CacheKey, _value: serde_json::Value, _ttl: Duration) {}

    fn invalidate(&self, _key: &CacheKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_ignores_argument_order() {
        let mut a = HashMap::new();
        a.insert("x".to_string(), json!(1));
        a.insert("y".to_string(), json!(2));

        let mut b = HashMap::new();
        b.insert("y".to_string(), json!(2));
        b.insert("x".to_string(), json!(1));

        assert_eq!(
            CacheKey::new("tool", &a, Some("conv-1")),
            CacheKey::new("tool", &b, Some("conv-1"))
        );
    }

    #[test]
    fn test_key_separates_conversations() {
        let args = HashMap::new();
        assert_ne!(
            CacheKey::new("tool", &args, Some("conv-1")),
            CacheKey::new("tool", &args, Some("conv-2"))
        );
        assert_ne!(
            CacheKey::new("tool", &args, Some("conv-1")),
            CacheKey::new("tool", &args, None)
        );
    }

    #[test]
    fn test_key_separates_tools() {
        let args = HashMap::new();
        assert_ne!(
            CacheKey::new("tool_a", &args, None),
            CacheKey::new("tool_b", &args, None)
        );
    }
}
