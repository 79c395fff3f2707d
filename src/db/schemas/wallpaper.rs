//! Wallpaper document schema
//!
//! One document per catalog image, keyed by an opaque `id` assigned at
//! upload time (blob store identifier) or by the seeder.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for wallpapers
pub const WALLPAPER_COLLECTION: &str = "wallpapers";

/// Wallpaper document stored in MongoDB
///
/// Field names match the wire format served to clients, so documents
/// round-trip through the cache without a rename pass.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WallpaperDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Opaque unique identifier; immutable after creation
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Category this wallpaper belongs to; mutable only via bulk rename
    pub category: String,

    /// URL of the image in blob storage
    pub url: String,

    /// Number of recorded views
    #[serde(default, rename = "viewCount")]
    pub view_count: i64,

    /// Number of recorded downloads
    #[serde(default, rename = "downloadCount")]
    pub download_count: i64,

    /// When the document was created
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    /// When the document was last updated
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl WallpaperDoc {
    /// Create a new wallpaper document with current timestamps
    pub fn new(id: String, name: String, category: String, url: String) -> Self {
        Self {
            _id: None,
            id,
            name,
            category,
            url,
            view_count: 0,
            download_count: 0,
            created_at: Some(DateTime::now()),
            updated_at: Some(DateTime::now()),
        }
    }
}

impl IntoIndexes for WallpaperDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on the opaque wallpaper id
            (
                doc! { "id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                ),
            ),
            // Index on category for paginated reads and bulk mutations
            (
                doc! { "category": 1 },
                Some(
                    IndexOptions::builder()
                        .name("category_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
