//! Cache invalidation after catalog mutations
//!
//! Every item creation, deletion, category rename, and category removal
//! must leave no stale page or index entry behind. The shipped policy is
//! coarse: dropping the category index key and every page key, whatever
//! category the mutation touched. A new or removed item shifts page
//! boundaries for its whole category and can change the index's previews,
//! so precise invalidation would have to track far more state than it
//! saves.
//!
//! The policy sits behind [`CatalogPurge`] so a targeted per-category
//! purge can replace it without touching the mutation flow; the affected
//! category names are passed through for that purpose even though the
//! coarse policy ignores them.
//!
//! Purging is best-effort. The store write has already committed by the
//! time a purge runs; an unreachable cache is logged and the mutation
//! still succeeds, leaving any stale entry to its own TTL.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::keys::{CATEGORY_INDEX_KEY, PAGE_KEY_PREFIX};
use crate::cache::store::CacheStore;

/// Deletes cache entries made stale by a catalog mutation.
#[async_trait]
pub trait CatalogPurge: Send + Sync {
    /// Purge entries after a mutation touching `affected_categories`.
    /// Never fails; cache trouble is logged and swallowed.
    async fn purge(&self, affected_categories: &[&str]);
}

/// Coarse purge: category index plus every page entry.
pub struct CoarsePurge {
    cache: Arc<dyn CacheStore>,
}

impl CoarsePurge {
    /// Create a new coarse purge over the given cache
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CatalogPurge for CoarsePurge {
    async fn purge(&self, affected_categories: &[&str]) {
        if let Err(e) = self.cache.delete(CATEGORY_INDEX_KEY).await {
            warn!(error = %e, "Failed to purge category index from cache");
        }

        match self.cache.list_keys_by_prefix(PAGE_KEY_PREFIX).await {
            Ok(keys) => {
                let total = keys.len();
                let mut purged = 0usize;
                for key in keys {
                    match self.cache.delete(&key).await {
                        Ok(()) => purged += 1,
                        Err(e) => warn!(key = %key, error = %e, "Failed to purge page entry"),
                    }
                }
                debug!(
                    purged = purged,
                    total = total,
                    categories = ?affected_categories,
                    "Purged cached pages"
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to list page entries for purge");
            }
        }
    }
}
