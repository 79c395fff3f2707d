//! Caching layer for catalog reads
//!
//! Deterministic keys, the cache contract, the in-memory TTL backend,
//! the read-through coordinator, and post-mutation invalidation.

pub mod invalidation;
pub mod keys;
pub mod memory;
pub mod readthrough;
pub mod store;

pub use invalidation::{CatalogPurge, CoarsePurge};
pub use keys::{PageKey, CATEGORY_INDEX_KEY, PAGE_KEY_PREFIX};
pub use memory::{spawn_cache_cleanup_task, CacheStats, InMemoryCache};
pub use readthrough::ReadThrough;
pub use store::CacheStore;
