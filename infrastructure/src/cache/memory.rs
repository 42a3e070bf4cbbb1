//! In-memory TTL result cache.
//!
//! A mutex-guarded map of expiring entries. Entry replacement is atomic
//! (whole-value swap under the lock), so a read racing a write sees either
//! the old or the new value, never a torn one. Writes are last-writer-wins.
//!
//! Expired entries are dropped lazily on read; there is no background
//! sweeper. For the short TTLs tool results use, stale entries pinned by an
//! idle key are an acceptable cost in a process-local cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::trace;

use switchboard_application::ports::result_cache::{CacheKey, ResultCache};

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Result cache backed by a process-local map.
#[derive(Default)]
pub struct InMemoryResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (possibly expired, not yet collected) entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                trace!(tool = key.tool(), "Cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                trace!(tool = key.tool(), "Cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: CacheKey, value: serde_json::Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    fn invalidate(&self, key: &CacheKey) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
