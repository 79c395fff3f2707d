//! Read-through cache coordinator
//!
//! Wraps a store query with cache-aside semantics:
//!
//! ```text
//! Request → Cache lookup
//!              ↓ hit: deserialize and return
//!              ↓ miss: run the query, populate cache with TTL, return
//! ```
//!
//! Cache failures never fail a read. A broken lookup, an undecodable
//! entry, or a failed populate all degrade to the live query with a
//! warning; only the live query itself can error. There is no
//! single-flight guard: concurrent misses on one key each run the query
//! and repopulate, last writer wins.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::store::CacheStore;
use crate::types::Result;

/// Cache-aside wrapper over a [`CacheStore`]
pub struct ReadThrough {
    cache: Arc<dyn CacheStore>,
}

impl ReadThrough {
    /// Create a new coordinator over the given cache
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// Serve `key` from cache, or run `fetch` and populate it.
    ///
    /// Returns the value plus whether it came from the cache. A `fetch`
    /// error propagates unchanged and nothing is cached, so callers can
    /// keep not-found conditions out of the cache by returning them from
    /// `fetch`.
    pub async fn get_or_populate<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<(T, bool)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    debug!(key = key, "Served from cache");
                    return Ok((value, true));
                }
                Err(e) => {
                    warn!(key = key, error = %e, "Dropping undecodable cache entry");
                    if let Err(e) = self.cache.delete(key).await {
                        warn!(key = key, error = %e, "Failed to drop cache entry");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, querying store directly");
            }
        }

        let value = fetch().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self
                    .cache
                    .set_with_ttl(key, Bytes::from(bytes), ttl)
                    .await
                {
                    warn!(key = key, error = %e, "Failed to populate cache");
                }
            }
            Err(e) => {
                warn!(key = key, error = %e, "Failed to serialize value for cache");
            }
        }

        Ok((value, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::InMemoryCache;
    use crate::types::CatalogError;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn coordinator() -> (ReadThrough, Arc<InMemoryCache>) {
        let cache = Arc::new(InMemoryCache::with_defaults());
        (ReadThrough::new(cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_miss_populates_then_hits() {
        let (rt, _cache) = coordinator();
        let calls = AtomicU64::new(0);
        let ttl = Duration::from_secs(60);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, CatalogError>(vec!["a".to_string(), "b".to_string()])
        };
        let (value, from_cache) = rt.get_or_populate("key", ttl, fetch).await.expect("fetch");
        assert_eq!(value.len(), 2);
        assert!(!from_cache);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, CatalogError>(vec!["never".to_string()])
        };
        let (value, from_cache) = rt.get_or_populate("key", ttl, fetch).await.expect("hit");
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert!(from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_and_caches_nothing() {
        let (rt, cache) = coordinator();

        let result = rt
            .get_or_populate::<Vec<String>, _, _>("key", Duration::from_secs(60), || async {
                Err(CatalogError::NotFound("nothing here".to_string()))
            })
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert!(cache.get("key").is_none());
    }

    #[tokio::test]
    async fn test_undecodable_entry_refetched() {
        let (rt, cache) = coordinator();
        cache.set(
            "key",
            Bytes::from_static(b"not valid json"),
            Duration::from_secs(60),
        );

        let (value, from_cache) = rt
            .get_or_populate("key", Duration::from_secs(60), || async {
                Ok::<_, CatalogError>(7u32)
            })
            .await
            .expect("refetch");

        assert_eq!(value, 7);
        assert!(!from_cache);

        // Entry was replaced with the decodable value
        let (value, from_cache) = rt
            .get_or_populate("key", Duration::from_secs(60), || async {
                Ok::<_, CatalogError>(0u32)
            })
            .await
            .expect("hit");
        assert_eq!(value, 7);
        assert!(from_cache);
    }
}
