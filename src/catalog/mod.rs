//! Wallpaper catalog domain
//!
//! The planner normalizes raw requests into retrieval strategies, the
//! service executes them through the cache-aside layer, and the store
//! contract abstracts the durable collection underneath.

pub mod pages;
pub mod planner;
pub mod service;
pub mod store;

pub use pages::{CategorySummary, Wallpaper, WallpaperPage};
pub use planner::{QueryPlan, Strategy, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use service::{BulkEntry, CatalogService};
pub use store::{CatalogStore, UpdateCounts};
