//! Database schemas for Muralis
//!
//! Defines the MongoDB document structure for wallpapers.

mod wallpaper;

pub use wallpaper::{WallpaperDoc, WALLPAPER_COLLECTION};
