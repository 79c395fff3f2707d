//! In-memory TTL cache
//!
//! DashMap-backed key-value store holding serialized pages and the
//! category index. Entries expire by TTL; when the entry limit is hit,
//! oldest entries are evicted first. All operations are O(1) except
//! prefix listing and eviction, which scan the map.
//!
//! Thread-safe; one instance is shared across every request handler.

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use async_trait::async_trait;

use crate::cache::store::CacheStore;
use crate::types::Result;

/// Default maximum number of entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// A cached value with its expiry
struct CacheEntry {
    data: Bytes,
    cached_at: Instant,
    expires_at: Instant,
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters exposed by the cache
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of live entries
    pub entries: usize,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Evictions due to the entry limit
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

// ============================================================================
// Cache Implementation
// ============================================================================

/// In-memory TTL cache with oldest-first eviction
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl InMemoryCache {
    /// Create a new cache holding at most `max_entries` values
    pub fn new(max_entries: usize) -> Self {
        info!(max_entries = max_entries, "InMemoryCache initialized");

        Self {
            entries: DashMap::new(),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create with default capacity
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }

    /// Get a value by key. O(1).
    pub fn get(&self, key: &str) -> Option<Bytes> {
        if let Some(entry) = self.entries.get(key) {
            if Instant::now() < entry.expires_at {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = key, "Cache hit");
                return Some(entry.data.clone());
            }
            // Expired
            drop(entry);
            self.entries.remove(key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = key, "Cache miss");
        None
    }

    /// Store a value with TTL. O(1) amortized.
    pub fn set(&self, key: &str, data: Bytes, ttl: Duration) {
        self.evict_until_fits(key);

        let now = Instant::now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + ttl,
        };

        debug!(key = key, ttl_secs = ttl.as_secs(), "Cache set");
        self.entries.insert(key.to_string(), entry);
    }

    /// Remove a key. O(1). Returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// List live keys starting with `prefix`. O(n).
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| e.key().starts_with(prefix) && now < e.expires_at)
            .map(|e| e.key().clone())
            .collect()
    }

    /// Evict oldest entries until inserting `key` stays within the limit
    fn evict_until_fits(&self, key: &str) {
        // Replacing an existing key does not grow the map
        if self.entries.contains_key(key) {
            return;
        }

        let current = self.entries.len();
        if current < self.max_entries {
            return;
        }

        let to_evict = current + 1 - self.max_entries;

        // Collect entries sorted by cached_at (oldest first)
        let mut entries: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.cached_at))
            .collect();

        entries.sort_by_key(|(_, cached_at)| *cached_at);

        let mut evicted = 0usize;
        for (key, _) in entries {
            if evicted >= to_evict {
                break;
            }
            if self.entries.remove(&key).is_some() {
                evicted += 1;
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        debug!(evicted = evicted, "Evicted entries to make space");
    }

    /// Remove all expired entries. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();

        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| now >= e.expires_at)
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0usize;
        for key in &expired {
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed = removed, "Cleaned up expired entries");
        }

        removed
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.entries.clear();
        info!("InMemoryCache cleared");
    }

    /// Get current statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(InMemoryCache::get(self, key))
    }

    async fn set_with_ttl(&self, key: &str, value: Bytes, ttl: Duration) -> Result<()> {
        self.set(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove(key);
        Ok(())
    }

    async fn list_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self.keys_with_prefix(prefix))
    }
}

// ============================================================================
// Background Cleanup Task
// ============================================================================

/// Spawn a background task to periodically cleanup expired entries
pub fn spawn_cache_cleanup_task(cache: Arc<InMemoryCache>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = cache.cleanup_expired();
            let stats = cache.stats();
            debug!(
                removed = removed,
                entries = stats.entries,
                hit_rate = format!("{:.1}%", stats.hit_rate()),
                "Cache cleanup completed"
            );
        }
    });

    info!(
        interval_secs = interval.as_secs(),
        "Cache cleanup task started"
    );
}

// ============================================================================
// Tests
// ============================================================================
