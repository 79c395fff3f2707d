//! MongoDB integration
//!
//! Client wrapper, schema definitions, and the Mongo-backed catalog store.

pub mod catalog_store;
pub mod mongo;
pub mod schemas;

pub use catalog_store::MongoCatalogStore;
pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
pub use schemas::{WallpaperDoc, WALLPAPER_COLLECTION};
