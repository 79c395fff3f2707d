//! Cache key definitions
//!
//! Deterministic keys for cached wallpaper pages and the category index.

use std::fmt;

/// Fixed key for the cached category index
pub const CATEGORY_INDEX_KEY: &str = "categories";

/// Namespace prefix shared by every cached wallpaper page
pub const PAGE_KEY_PREFIX: &str = "wallpapers:";

/// Cache key for one page of wallpapers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Category the page was filtered by (reserved names included)
    pub category: String,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl PageKey {
    /// Create a new page key
    pub fn new(category: &str, page: u32, limit: u32) -> Self {
        Self {
            category: category.to_string(),
            page,
            limit,
        }
    }

    /// Convert to storage key string
    /// Format: wallpapers:{category}:{page}:{limit}
    pub fn to_storage_key(&self) -> String {
        format!(
            "{}{}:{}:{}",
            PAGE_KEY_PREFIX, self.category, self.page, self.limit
        )
    }

    /// Prefix matching every page key, for coarse invalidation
    pub fn invalidation_prefix() -> &'static str {
        PAGE_KEY_PREFIX
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} p{}/{}", self.category, self.page, self.limit)
    }
}
