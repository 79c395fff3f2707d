//! Query planner for wallpaper reads
//!
//! Turns a logical request (category, page, limit, optional favourite id
//! set) into a retrieval strategy plus the cache slot it may be served
//! from. Two category names are reserved: `all-wallpapers` selects a
//! random sample across every category, and `favourite` selects by an
//! explicit caller-supplied id set.

use crate::cache::keys::PageKey;
use crate::types::{CatalogError, Result};

/// Reserved category selecting a random sample of the whole collection
pub const ALL_WALLPAPERS_CATEGORY: &str = "all-wallpapers";

/// Reserved category selecting by caller-supplied wallpaper ids
pub const FAVOURITES_CATEGORY: &str = "favourite";

/// Page number used when a request does not carry a usable one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a request does not carry a usable one
pub const DEFAULT_LIMIT: u32 = 10;

/// How a page of wallpapers is retrieved from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Random sample of `limit` items across every category.
    ///
    /// When the result lands in the cache, that sample is frozen for the
    /// TTL window; repeat readers of the same (page, limit) slot see the
    /// same "random" items until the entry expires. Intended behavior.
    AllWallpapers,

    /// Items whose id is in the caller-supplied set, paginated in
    /// store-native order. Never cached: the set is arbitrary per caller
    /// and unusable as a shared key.
    IdSet(Vec<String>),

    /// Exact category equality, paginated in store-native order.
    Category,
}

/// A validated, normalized read request.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub category: String,
    pub page: u32,
    pub limit: u32,
    pub strategy: Strategy,
}

impl QueryPlan {
    /// Build a plan from raw request values.
    ///
    /// `page` and `limit` are floored to 1 when non-positive. An empty id
    /// set is treated as absent, so `favourite` without ids falls back to
    /// plain category filtering. Fails when `category` is empty.
    pub fn new(
        category: &str,
        page: i64,
        limit: i64,
        id_set: Option<Vec<String>>,
    ) -> Result<Self> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CatalogError::Validation("Category is required".to_string()));
        }

        let page = page.clamp(1, u32::MAX as i64) as u32;
        let limit = limit.clamp(1, u32::MAX as i64) as u32;

        let strategy = if category == ALL_WALLPAPERS_CATEGORY {
            Strategy::AllWallpapers
        } else if category == FAVOURITES_CATEGORY {
            match id_set {
                Some(ids) if !ids.is_empty() => Strategy::IdSet(ids),
                _ => Strategy::Category,
            }
        } else {
            Strategy::Category
        };

        Ok(Self {
            category: category.to_string(),
            page,
            limit,
            strategy,
        })
    }

    /// Storage key this plan may be served from, or `None` when the plan
    /// must always execute live.
    ///
    /// `favourite` reads are never cached, with or without an id set:
    /// nothing may ever populate a shared slot from a caller-specific
    /// result.
    pub fn cache_key(&self) -> Option<String> {
        if self.category == FAVOURITES_CATEGORY {
            return None;
        }
        Some(PageKey::new(&self.category, self.page, self.limit).to_storage_key())
    }

    /// Number of documents to skip for this page.
    pub fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}
