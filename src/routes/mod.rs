//! HTTP routes for Muralis

pub mod categories;
pub mod envelope;
pub mod health;
pub mod wallpapers;

pub use categories::{handle_get_categories, handle_remove_category, handle_rename_category};
pub use envelope::{catalog_error_response, error_response, success_response};
pub use health::{health_check, version_info};
pub use wallpapers::{
    handle_add_wallpaper, handle_add_wallpaper_bulk, handle_delete_wallpaper,
    handle_inc_download_count, handle_inc_view_count, handle_list_wallpapers,
    ListWallpapersQuery,
};
