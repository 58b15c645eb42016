//! Read-through content cache
//!
//! A plain key-to-text lookup shared between requests. Lifecycle is
//! populate-on-miss and clear-on-demand; the most recently stored value
//! wins and there are no other consistency guarantees. Eviction is the
//! owner's concern, not the engine's.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent key→text cache with hit/miss accounting.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<String, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, counting the hit or miss.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value. Overwrites any previous value for the key.
    pub fn store(&self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Return the cached value, populating it from `load` on a miss.
    pub fn get_or_populate(&self, key: &str, load: impl FnOnce() -> String) -> String {
        if let Some(cached) = self.get(key) {
            return cached;
        }
        let text = load();
        self.store(key, text.clone());
        text
    }

    /// Drop all entries. Hit/miss counters are preserved.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
