//! Wire types for catalog reads
//!
//! These shapes are what handlers serialize into response envelopes and
//! what the cache stores, so their field names are the public wire
//! format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::schemas::WallpaperDoc;

/// A wallpaper as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallpaper {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: String,
    pub url: String,
    #[serde(rename = "viewCount", default)]
    pub view_count: i64,
    #[serde(rename = "downloadCount", default)]
    pub download_count: i64,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<WallpaperDoc> for Wallpaper {
    fn from(doc: WallpaperDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            category: doc.category,
            url: doc.url,
            view_count: doc.view_count,
            download_count: doc.download_count,
            created_at: doc.created_at.map(|d| d.to_chrono()),
            updated_at: doc.updated_at.map(|d| d.to_chrono()),
        }
    }
}

/// One entry of the derived category index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    #[serde(rename = "previewUrl")]
    pub preview_url: String,
}

/// A page of wallpapers with its pagination envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallpaperPage {
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub wallpapers: Vec<Wallpaper>,
}

impl WallpaperPage {
    /// Build a page from store documents, preserving their order
    pub fn assemble(page: u32, limit: u32, total_count: u64, docs: Vec<WallpaperDoc>) -> Self {
        Self {
            page,
            limit,
            total_pages: total_pages(total_count, limit),
            total_count,
            wallpapers: docs.into_iter().map(Wallpaper::from).collect(),
        }
    }
}

/// Number of pages needed for `total_count` items at `limit` per page.
/// `limit` is floored to 1 before reaching here.
pub fn total_pages(total_count: u64, limit: u32) -> u32 {
    ((total_count as f64) / (limit as f64)).ceil() as u32
}
