//! Configuration for Muralis
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Muralis - wallpaper catalog API
///
/// Serves paginated wallpaper pages and a derived category index from
/// MongoDB, with an in-process TTL cache in front of the hot read paths.
#[derive(Parser, Debug, Clone)]
#[command(name = "muralis")]
#[command(about = "Wallpaper catalog API with cache-aside reads over MongoDB")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "muralis")]
    pub mongodb_db: String,

    /// URL of the blob storage service holding original image bytes
    /// (e.g., "http://localhost:8091")
    /// Uploads are forwarded here; deletes are issued here by image id
    #[arg(long, env = "STORAGE_URL", default_value = "http://localhost:8091")]
    pub storage_url: String,

    /// API key sent to the blob storage service (optional)
    #[arg(long, env = "STORAGE_API_KEY")]
    pub storage_api_key: Option<String>,

    /// TTL in seconds for cached wallpaper pages
    #[arg(long, env = "PAGE_CACHE_TTL_SECONDS", default_value = "900")]
    pub page_cache_ttl_seconds: u64,

    /// TTL in seconds for the cached category index
    #[arg(long, env = "CATEGORY_CACHE_TTL_SECONDS", default_value = "3600")]
    pub category_cache_ttl_seconds: u64,

    /// Maximum number of entries held by the in-process cache
    /// Oldest entries are evicted first once the limit is reached
    #[arg(long, env = "CACHE_MAX_ENTRIES", default_value = "10000")]
    pub cache_max_entries: usize,

    /// Interval in seconds between expired-entry sweeps of the cache
    #[arg(long, env = "CACHE_CLEANUP_INTERVAL_SECONDS", default_value = "60")]
    pub cache_cleanup_interval_seconds: u64,

    /// Value for the Access-Control-Allow-Origin response header
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// TTL applied to cached wallpaper pages
    pub fn page_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.page_cache_ttl_seconds)
    }

    /// TTL applied to the cached category index
    pub fn category_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.category_cache_ttl_seconds)
    }

    /// Interval between expired-entry sweeps
    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.page_cache_ttl_seconds == 0 {
            return Err("PAGE_CACHE_TTL_SECONDS must be greater than zero".to_string());
        }

        if self.category_cache_ttl_seconds == 0 {
            return Err("CATEGORY_CACHE_TTL_SECONDS must be greater than zero".to_string());
        }

        if self.cache_max_entries == 0 {
            return Err("CACHE_MAX_ENTRIES must be greater than zero".to_string());
        }

        if !self.storage_url.starts_with("http://") && !self.storage_url.starts_with("https://") {
            return Err("STORAGE_URL must be an http(s) URL".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["muralis"])
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = base_args();
        assert!(args.validate().is_ok());
        assert_eq!(args.page_cache_ttl(), Duration::from_secs(900));
        assert_eq!(args.category_cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut args = base_args();
        args.page_cache_ttl_seconds = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_storage_url_must_be_http() {
        let mut args = base_args();
        args.storage_url = "ftp://example.com".to_string();
        assert!(args.validate().is_err());
    }
}
