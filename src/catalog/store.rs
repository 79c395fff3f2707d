//! Catalog store contract
//!
//! Abstracts the durable wallpaper collection behind the operations the
//! catalog actually performs. The shipped implementation is
//! [`crate::db::MongoCatalogStore`]; tests substitute an in-memory fake.

use async_trait::async_trait;
use bson::Document;

use crate::db::schemas::WallpaperDoc;
use crate::types::Result;

/// Counts reported by a batch update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

/// Durable store for wallpaper documents.
///
/// Filters and patches are BSON documents so implementations map directly
/// onto MongoDB semantics; the in-memory test double interprets the small
/// subset the catalog emits (`category` equality, `id` equality, `$in` on
/// `id`, `$set`, `$inc`).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Filtered read in store-native order, paginated via skip/limit.
    async fn find_by_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<WallpaperDoc>>;

    /// Number of documents matching the filter.
    async fn count_by_filter(&self, filter: Document) -> Result<u64>;

    /// Unordered random sample across the whole collection.
    ///
    /// Each call may return a different sample; callers that cache the
    /// result freeze one sample for the cache entry's lifetime.
    async fn sample_random(&self, size: i64) -> Result<Vec<WallpaperDoc>>;

    /// Distinct values of `field` with one representative (first-seen)
    /// document per value, ordered by value.
    async fn group_distinct(&self, field: &str) -> Result<Vec<(String, WallpaperDoc)>>;

    /// Batch update; reports how many documents matched and changed.
    async fn update_many_by_filter(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<UpdateCounts>;

    /// Batch delete; reports how many documents were removed.
    async fn delete_many_by_filter(&self, filter: Document) -> Result<u64>;

    /// Insert a document and return it as stored.
    async fn insert_one(&self, wallpaper: WallpaperDoc) -> Result<WallpaperDoc>;

    /// Atomically update one document and return the updated version,
    /// or `None` when nothing matched.
    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<WallpaperDoc>>;

    /// Atomically remove one document and return it, or `None` when
    /// nothing matched.
    async fn find_one_and_delete(&self, filter: Document) -> Result<Option<WallpaperDoc>>;
}
