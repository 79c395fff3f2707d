//! Catalog service
//!
//! Every handler goes through this layer. Reads consult the cache first
//! and fall back to the store; writes go straight to the store and then
//! purge derived cache entries so later reads rebuild them. Purges only
//! run after the store has reported a change, so a failed or matched-
//! nothing write never evicts warm entries.

use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use bytes::Bytes;
use tracing::{info, warn};

use crate::cache::{CatalogPurge, ReadThrough, CATEGORY_INDEX_KEY};
use crate::catalog::pages::{CategorySummary, Wallpaper, WallpaperPage};
use crate::catalog::planner::{QueryPlan, Strategy};
use crate::catalog::store::CatalogStore;
use crate::db::schemas::WallpaperDoc;
use crate::storage::BlobStore;
use crate::types::{CatalogError, Result};

/// One wallpaper of a bulk upload, already decoded to raw bytes
#[derive(Debug, Clone)]
pub struct BulkEntry {
    pub name: String,
    pub data: Bytes,
    pub content_type: String,
}

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    cache: ReadThrough,
    purge: Arc<dyn CatalogPurge>,
    blobs: Arc<dyn BlobStore>,
    page_ttl: Duration,
    category_ttl: Duration,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: ReadThrough,
        purge: Arc<dyn CatalogPurge>,
        blobs: Arc<dyn BlobStore>,
        page_ttl: Duration,
        category_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            purge,
            blobs,
            page_ttl,
            category_ttl,
        }
    }

    /// Serve one page for the plan, from cache when the plan allows it.
    /// Returns the page plus whether it came from the cache.
    pub async fn list_wallpapers(&self, plan: &QueryPlan) -> Result<(WallpaperPage, bool)> {
        match plan.cache_key() {
            Some(key) => {
                self.cache
                    .get_or_populate(&key, self.page_ttl, || self.execute_plan(plan))
                    .await
            }
            // Favourite pages are per-client; a shared cache slot would
            // leak one client's set to another
            None => Ok((self.execute_plan(plan).await?, false)),
        }
    }

    async fn execute_plan(&self, plan: &QueryPlan) -> Result<WallpaperPage> {
        let (docs, total) = match &plan.strategy {
            Strategy::AllWallpapers => {
                let docs = self.store.sample_random(plan.limit as i64).await?;
                let total = self.store.count_by_filter(doc! {}).await?;
                (docs, total)
            }
            Strategy::IdSet(ids) => {
                let filter = doc! { "id": { "$in": ids.clone() } };
                let docs = self
                    .store
                    .find_by_filter(filter.clone(), plan.skip(), plan.limit as i64)
                    .await?;
                let total = self.store.count_by_filter(filter).await?;
                (docs, total)
            }
            Strategy::Category => {
                let filter = doc! { "category": plan.category.as_str() };
                let docs = self
                    .store
                    .find_by_filter(filter.clone(), plan.skip(), plan.limit as i64)
                    .await?;
                let total = self.store.count_by_filter(filter).await?;
                (docs, total)
            }
        };
        Ok(WallpaperPage::assemble(plan.page, plan.limit, total, docs))
    }

    /// Serve the derived category index, from cache when possible.
    /// Each category is represented by its oldest wallpaper's URL.
    pub async fn list_categories(&self) -> Result<(Vec<CategorySummary>, bool)> {
        self.cache
            .get_or_populate(CATEGORY_INDEX_KEY, self.category_ttl, || async {
                let groups = self.store.group_distinct("category").await?;
                if groups.is_empty() {
                    // An empty catalog is a seeding gap; keep it out of
                    // the cache so recovery is visible immediately
                    return Err(CatalogError::NotFound("No categories found".to_string()));
                }
                Ok(groups
                    .into_iter()
                    .map(|(name, doc)| CategorySummary {
                        name,
                        preview_url: doc.url,
                    })
                    .collect::<Vec<_>>())
            })
            .await
    }

    /// Upload an image and record its wallpaper, then purge derived
    /// cache entries so the new item shows up in pages and the index.
    pub async fn add_wallpaper(
        &self,
        category: &str,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<Wallpaper> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CatalogError::Validation("Category is required".to_string()));
        }

        let wallpaper = self
            .add_wallpaper_unpurged(category, name, data, content_type)
            .await?;
        self.purge.purge(&[category]).await;

        Ok(wallpaper)
    }

    /// Upload a batch into one category. Entries that fail to upload or
    /// insert are skipped rather than aborting the batch, and a single
    /// purge runs at the end.
    pub async fn add_wallpapers_bulk(
        &self,
        category: &str,
        entries: Vec<BulkEntry>,
    ) -> Result<Vec<Wallpaper>> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CatalogError::Validation("Category is required".to_string()));
        }
        if entries.is_empty() {
            return Err(CatalogError::Validation(
                "No wallpapers provided".to_string(),
            ));
        }

        let mut uploaded = Vec::new();
        for entry in entries {
            match self
                .add_wallpaper_unpurged(category, &entry.name, entry.data, &entry.content_type)
                .await
            {
                Ok(wallpaper) => uploaded.push(wallpaper),
                Err(e) => warn!("Skipping wallpaper '{}': {}", entry.name, e),
            }
        }

        self.purge.purge(&[category]).await;
        Ok(uploaded)
    }

    async fn add_wallpaper_unpurged(
        &self,
        category: &str,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<Wallpaper> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation("Name is required".to_string()));
        }
        if data.is_empty() {
            return Err(CatalogError::Validation(
                "Image data is required".to_string(),
            ));
        }

        let stored = self.blobs.upload(data, content_type, name).await?;
        let doc = WallpaperDoc::new(
            stored.id,
            name.to_string(),
            category.to_string(),
            stored.url,
        );
        let inserted = self.store.insert_one(doc).await?;

        info!(
            "Added wallpaper '{}' to category '{}'",
            inserted.id, category
        );
        Ok(Wallpaper::from(inserted))
    }

    /// Delete a wallpaper and purge derived cache entries. The image
    /// blob is removed best-effort: the catalog record is already gone
    /// and a leftover blob is only wasted storage.
    pub async fn delete_wallpaper(&self, id: &str) -> Result<Wallpaper> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::Validation(
                "Wallpaper id is required".to_string(),
            ));
        }

        let deleted = self
            .store
            .find_one_and_delete(doc! { "id": id })
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Wallpaper '{}' not found", id)))?;

        if let Err(e) = self.blobs.delete(&deleted.id).await {
            warn!(
                "Failed to delete image for wallpaper '{}': {}",
                deleted.id, e
            );
        }

        info!(
            "Deleted wallpaper '{}' from category '{}'",
            deleted.id, deleted.category
        );
        self.purge.purge(&[deleted.category.as_str()]).await;

        Ok(Wallpaper::from(deleted))
    }

    /// Record one view. Counters are display-only and drift inside the
    /// page TTL is acceptable, so no purge happens here.
    pub async fn increment_view_count(&self, id: &str) -> Result<()> {
        let update = doc! {
            "$inc": { "viewCount": 1 },
            "$currentDate": { "updatedAt": true },
        };
        self.apply_counter(id, update).await
    }

    /// Record one download. Same caching trade-off as view counts.
    pub async fn increment_download_count(&self, id: &str) -> Result<()> {
        let update = doc! {
            "$inc": { "downloadCount": 1 },
            "$currentDate": { "updatedAt": true },
        };
        self.apply_counter(id, update).await
    }

    async fn apply_counter(&self, id: &str, update: bson::Document) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::Validation(
                "Wallpaper id is required".to_string(),
            ));
        }

        self.store
            .find_one_and_update(doc! { "id": id }, update)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Wallpaper '{}' not found", id)))?;
        Ok(())
    }

    /// Rename a category across all of its wallpapers. Purges only after
    /// the store reports a change; a miss leaves warm entries alone.
    pub async fn rename_category(&self, old_name: &str, new_name: &str) -> Result<u64> {
        let old_name = old_name.trim();
        let new_name = new_name.trim();
        if old_name.is_empty() || new_name.is_empty() {
            return Err(CatalogError::Validation(
                "Both old and new category names are required".to_string(),
            ));
        }

        let update = doc! {
            "$set": { "category": new_name },
            "$currentDate": { "updatedAt": true },
        };
        let counts = self
            .store
            .update_many_by_filter(doc! { "category": old_name }, update)
            .await?;

        if counts.modified == 0 {
            return Err(CatalogError::NotFound(format!(
                "Category '{}' not found",
                old_name
            )));
        }

        info!(
            "Renamed category '{}' to '{}' ({} wallpapers)",
            old_name, new_name, counts.modified
        );
        self.purge.purge(&[old_name, new_name]).await;

        Ok(counts.modified)
    }

    /// Delete every wallpaper in a category. Image blobs are left
    /// behind; reclaiming them is a storage-side sweep, not a catalog
    /// concern.
    pub async fn remove_category(&self, name: &str) -> Result<u64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Category name is required".to_string(),
            ));
        }

        let deleted = self
            .store
            .delete_many_by_filter(doc! { "category": name })
            .await?;

        if deleted == 0 {
            return Err(CatalogError::NotFound(format!(
                "Category '{}' not found",
                name
            )));
        }

        info!("Removed category '{}' ({} wallpapers)", name, deleted);
        self.purge.purge(&[name]).await;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    use bson::{Bson, Document};

    use crate::cache::{CacheStore, CoarsePurge, InMemoryCache};
    use crate::catalog::store::UpdateCounts;
    use crate::storage::StoredImage;

    fn matches(filter: &Document, doc: &WallpaperDoc) -> bool {
        for (key, value) in filter {
            let ok = match (key.as_str(), value) {
                ("category", Bson::String(name)) => doc.category == *name,
                ("id", Bson::String(id)) => doc.id == *id,
                ("id", Bson::Document(inner)) => match inner.get_array("$in") {
                    Ok(ids) => ids.iter().any(|b| b.as_str() == Some(doc.id.as_str())),
                    Err(_) => false,
                },
                _ => false,
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn apply_update(update: &Document, doc: &mut WallpaperDoc) -> bool {
        let mut changed = false;
        if let Ok(set) = update.get_document("$set") {
            if let Ok(category) = set.get_str("category") {
                if doc.category != category {
                    doc.category = category.to_string();
                    changed = true;
                }
            }
        }
        if let Ok(inc) = update.get_document("$inc") {
            if inc.get("viewCount").is_some() {
                doc.view_count += 1;
                changed = true;
            }
            if inc.get("downloadCount").is_some() {
                doc.download_count += 1;
                changed = true;
            }
        }
        changed
    }

    struct FakeStore {
        docs: Mutex<Vec<WallpaperDoc>>,
        find_calls: AtomicU64,
    }

    #[async_trait::async_trait]
    impl CatalogStore for FakeStore {
        async fn find_by_filter(
            &self,
            filter: Document,
            skip: u64,
            limit: i64,
        ) -> Result<Vec<WallpaperDoc>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            let docs = self.docs.lock().unwrap();
            Ok(docs
                .iter()
                .filter(|d| matches(&filter, d))
                .skip(skip as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count_by_filter(&self, filter: Document) -> Result<u64> {
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().filter(|d| matches(&filter, d)).count() as u64)
        }

        async fn sample_random(&self, size: i64) -> Result<Vec<WallpaperDoc>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().take(size as usize).cloned().collect())
        }

        async fn group_distinct(&self, _field: &str) -> Result<Vec<(String, WallpaperDoc)>> {
            let docs = self.docs.lock().unwrap();
            let mut groups: Vec<(String, WallpaperDoc)> = Vec::new();
            for doc in docs.iter() {
                if !groups.iter().any(|(name, _)| *name == doc.category) {
                    groups.push((doc.category.clone(), doc.clone()));
                }
            }
            groups.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(groups)
        }

        async fn update_many_by_filter(
            &self,
            filter: Document,
            update: Document,
        ) -> Result<UpdateCounts> {
            let mut docs = self.docs.lock().unwrap();
            let mut counts = UpdateCounts {
                matched: 0,
                modified: 0,
            };
            for doc in docs.iter_mut().filter(|d| matches(&filter, d)) {
                counts.matched += 1;
                if apply_update(&update, doc) {
                    counts.modified += 1;
                }
            }
            Ok(counts)
        }

        async fn delete_many_by_filter(&self, filter: Document) -> Result<u64> {
            let mut docs = self.docs.lock().unwrap();
            let before = docs.len();
            docs.retain(|d| !matches(&filter, d));
            Ok((before - docs.len()) as u64)
        }

        async fn insert_one(&self, wallpaper: WallpaperDoc) -> Result<WallpaperDoc> {
            self.docs.lock().unwrap().push(wallpaper.clone());
            Ok(wallpaper)
        }

        async fn find_one_and_update(
            &self,
            filter: Document,
            update: Document,
        ) -> Result<Option<WallpaperDoc>> {
            let mut docs = self.docs.lock().unwrap();
            for doc in docs.iter_mut() {
                if matches(&filter, doc) {
                    apply_update(&update, doc);
                    return Ok(Some(doc.clone()));
                }
            }
            Ok(None)
        }

        async fn find_one_and_delete(&self, filter: Document) -> Result<Option<WallpaperDoc>> {
            let mut docs = self.docs.lock().unwrap();
            if let Some(pos) = docs.iter().position(|d| matches(&filter, d)) {
                return Ok(Some(docs.remove(pos)));
            }
            Ok(None)
        }
    }

    struct FakeBlobs {
        uploads: AtomicU64,
        deletes: AtomicU64,
        fail_upload_for: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl BlobStore for FakeBlobs {
        async fn upload(
            &self,
            _data: Bytes,
            _content_type: &str,
            name: &str,
        ) -> Result<StoredImage> {
            if self.fail_upload_for.lock().unwrap().iter().any(|n| n == name) {
                return Err(CatalogError::Storage(format!(
                    "upload refused for '{}'",
                    name
                )));
            }
            let n = self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(StoredImage {
                id: format!("img-{}-{}", name, n),
                url: format!("https://img.example/{}-{}.jpg", name, n),
            })
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Harness {
        service: CatalogService,
        store: Arc<FakeStore>,
        cache: Arc<InMemoryCache>,
        blobs: Arc<FakeBlobs>,
    }

    fn harness(docs: Vec<WallpaperDoc>) -> Harness {
        let store = Arc::new(FakeStore {
            docs: Mutex::new(docs),
            find_calls: AtomicU64::new(0),
        });
        let cache = Arc::new(InMemoryCache::new(100));
        let blobs = Arc::new(FakeBlobs {
            uploads: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            fail_upload_for: Mutex::new(Vec::new()),
        });
        let cache_store: Arc<dyn CacheStore> = cache.clone();
        let service = CatalogService::new(
            store.clone(),
            ReadThrough::new(cache_store.clone()),
            Arc::new(CoarsePurge::new(cache_store)),
            blobs.clone(),
            Duration::from_secs(900),
            Duration::from_secs(3600),
        );
        Harness {
            service,
            store,
            cache,
            blobs,
        }
    }

    fn seed_docs() -> Vec<WallpaperDoc> {
        let mut docs = Vec::new();
        for category in ["Abstract", "Nature"] {
            for i in 1..=15 {
                docs.push(WallpaperDoc::new(
                    format!("{}_{}", category, i),
                    format!("{}_{}", category, i),
                    category.to_string(),
                    format!("https://img.example/{}/{}.jpg", category, i),
                ));
            }
        }
        docs
    }

    #[tokio::test]
    async fn test_category_page_second_read_hits_cache() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();

        let (page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.wallpapers.len(), 10);
        assert_eq!(page.total_count, 15);
        assert_eq!(page.total_pages, 2);

        let calls_before = h.store.find_calls.load(Ordering::SeqCst);
        let (cached_page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(from_cache);
        assert_eq!(cached_page, page);
        assert_eq!(h.store.find_calls.load(Ordering::SeqCst), calls_before);
    }

    #[tokio::test]
    async fn test_pages_cached_per_page_and_limit() {
        let h = harness(seed_docs());
        let first = QueryPlan::new("Nature", 1, 10, None).unwrap();
        let second = QueryPlan::new("Nature", 2, 10, None).unwrap();

        let (page1, _) = h.service.list_wallpapers(&first).await.unwrap();
        let (page2, from_cache) = h.service.list_wallpapers(&second).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page2.wallpapers.len(), 5);
        assert_ne!(page1.wallpapers[0].id, page2.wallpapers[0].id);
        assert_eq!(h.cache.keys_with_prefix("wallpapers:").len(), 2);
    }

    #[tokio::test]
    async fn test_all_wallpapers_counts_whole_catalog() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("all-wallpapers", 1, 10, None).unwrap();

        let (page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.wallpapers.len(), 10);
        assert_eq!(page.total_count, 30);
        assert_eq!(page.total_pages, 3);

        let (_, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(from_cache);
    }

    #[tokio::test]
    async fn test_favourites_bypass_cache() {
        let h = harness(seed_docs());
        let ids = vec!["Nature_1".to_string(), "Abstract_2".to_string()];
        let plan = QueryPlan::new("favourite", 1, 10, Some(ids)).unwrap();

        let (page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.total_count, 2);

        // Nothing may be written for favourites, they are per-client
        assert!(h.cache.keys_with_prefix("").is_empty());

        let (_, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
    }

    #[tokio::test]
    async fn test_categories_cached_after_first_read() {
        let h = harness(seed_docs());

        let (categories, from_cache) = h.service.list_categories().await.unwrap();
        assert!(!from_cache);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Abstract");
        assert_eq!(categories[1].name, "Nature");
        assert!(categories[0].preview_url.contains("Abstract"));

        let (_, from_cache) = h.service.list_categories().await.unwrap();
        assert!(from_cache);
    }

    #[tokio::test]
    async fn test_empty_catalog_categories_not_found_and_not_cached() {
        let h = harness(Vec::new());

        let err = h.service.list_categories().await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(h.cache.get(CATEGORY_INDEX_KEY).is_none());
    }

    #[tokio::test]
    async fn test_add_wallpaper_persists_and_purges() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();
        h.service.list_wallpapers(&plan).await.unwrap();
        h.service.list_categories().await.unwrap();

        let added = h
            .service
            .add_wallpaper("Nature", "sunset", Bytes::from_static(b"jpegdata"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(added.category, "Nature");
        assert!(added.url.starts_with("https://img.example/"));
        assert_eq!(h.blobs.uploads.load(Ordering::SeqCst), 1);

        // Purge forces the next read back to the store
        let (page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.total_count, 16);
        assert!(h.cache.get(CATEGORY_INDEX_KEY).is_none());
    }

    #[tokio::test]
    async fn test_add_wallpaper_rejects_blank_fields() {
        let h = harness(Vec::new());
        let data = Bytes::from_static(b"jpegdata");

        let err = h
            .service
            .add_wallpaper("  ", "sunset", data.clone(), "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = h
            .service
            .add_wallpaper("Nature", "", data, "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = h
            .service
            .add_wallpaper("Nature", "sunset", Bytes::new(), "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(h.blobs.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bulk_add_skips_failed_entries() {
        let h = harness(Vec::new());
        h.blobs.fail_upload_for.lock().unwrap().push("bad".to_string());

        let entries = vec![
            BulkEntry {
                name: "good".to_string(),
                data: Bytes::from_static(b"a"),
                content_type: "image/png".to_string(),
            },
            BulkEntry {
                name: "bad".to_string(),
                data: Bytes::from_static(b"b"),
                content_type: "image/png".to_string(),
            },
            BulkEntry {
                name: "also-good".to_string(),
                data: Bytes::from_static(b"c"),
                content_type: "image/png".to_string(),
            },
        ];
        let uploaded = h.service.add_wallpapers_bulk("Nature", entries).await.unwrap();

        assert_eq!(uploaded.len(), 2);
        assert_eq!(h.store.docs.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_wallpaper_removes_blob_and_purges() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();
        h.service.list_wallpapers(&plan).await.unwrap();

        let deleted = h.service.delete_wallpaper("Nature_3").await.unwrap();
        assert_eq!(deleted.id, "Nature_3");
        assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 1);
        assert!(h.cache.keys_with_prefix("wallpapers:").is_empty());

        let err = h.service.delete_wallpaper("Nature_3").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        // Nothing further was deleted from blob storage
        assert_eq!(h.blobs.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deleting_item_refreshes_partial_last_page() {
        let mut docs = Vec::new();
        for i in 1..=25 {
            docs.push(WallpaperDoc::new(
                format!("Nature_{}", i),
                format!("Nature_{}", i),
                "Nature".to_string(),
                format!("https://img.example/Nature/{}.jpg", i),
            ));
        }
        let h = harness(docs);
        let last_page = QueryPlan::new("Nature", 3, 10, None).unwrap();

        let (page, _) = h.service.list_wallpapers(&last_page).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.wallpapers.len(), 5);

        h.service.delete_wallpaper("Nature_1").await.unwrap();

        // The purge forces a recount; the shrunken last page is served live
        let (page, from_cache) = h.service.list_wallpapers(&last_page).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.total_count, 24);
        assert_eq!(page.wallpapers.len(), 4);
    }

    #[tokio::test]
    async fn test_counter_increments_do_not_purge_cache() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();
        h.service.list_wallpapers(&plan).await.unwrap();

        h.service.increment_view_count("Nature_1").await.unwrap();
        h.service.increment_download_count("Nature_1").await.unwrap();

        let (_, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(from_cache);

        let doc = h.store.docs.lock().unwrap()[15].clone();
        assert_eq!(doc.id, "Nature_1");
        assert_eq!(doc.view_count, 1);
        assert_eq!(doc.download_count, 1);
    }

    #[tokio::test]
    async fn test_counter_increment_unknown_id_not_found() {
        let h = harness(seed_docs());
        let err = h.service.increment_view_count("missing").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        let err = h.service.increment_download_count("  ").await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rename_category_miss_leaves_cache_untouched() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();
        h.service.list_wallpapers(&plan).await.unwrap();
        assert_eq!(h.cache.keys_with_prefix("wallpapers:").len(), 1);

        let err = h
            .service
            .rename_category("NoSuch", "Renamed")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        // The gate failed, so warm entries must survive
        assert_eq!(h.cache.keys_with_prefix("wallpapers:").len(), 1);
    }

    #[tokio::test]
    async fn test_rename_category_purges_cache() {
        let h = harness(seed_docs());
        let plan = QueryPlan::new("Nature", 1, 10, None).unwrap();
        h.service.list_wallpapers(&plan).await.unwrap();
        h.service.list_categories().await.unwrap();

        let modified = h.service.rename_category("Nature", "Outdoors").await.unwrap();
        assert_eq!(modified, 15);

        assert!(h.cache.keys_with_prefix("wallpapers:").is_empty());
        assert!(h.cache.get(CATEGORY_INDEX_KEY).is_none());

        let plan = QueryPlan::new("Outdoors", 1, 10, None).unwrap();
        let (page, from_cache) = h.service.list_wallpapers(&plan).await.unwrap();
        assert!(!from_cache);
        assert_eq!(page.total_count, 15);
    }

    #[tokio::test]
    async fn test_remove_category_deletes_and_purges() {
        let h = harness(seed_docs());
        h.service.list_categories().await.unwrap();

        let deleted = h.service.remove_category("Nature").await.unwrap();
        assert_eq!(deleted, 15);
        assert!(h.cache.get(CATEGORY_INDEX_KEY).is_none());

        let (categories, _) = h.service.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Abstract");

        let err = h.service.remove_category("Nature").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
