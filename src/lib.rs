//! Muralis - wallpaper catalog API
//!
//! Serves paginated wallpaper pages and a derived category index from
//! MongoDB, with an in-process TTL cache in front of the hot read paths
//! and write-side invalidation keeping the two consistent.
//!
//! ## Services
//!
//! - **Catalog**: query planning, cache-aside reads, gated invalidation
//! - **Cache**: in-memory TTL store with prefix purges and stats
//! - **Db**: MongoDB client, wallpaper schema, catalog store
//! - **Storage**: HTTP client for the image blob service
//! - **Routes**: wallpaper/category endpoints plus health and version

pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod storage;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{CatalogError, Result};
