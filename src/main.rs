//! Muralis - wallpaper catalog API

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use muralis::{
    cache::{CacheStore, CoarsePurge, InMemoryCache, ReadThrough},
    catalog::CatalogService,
    config::Args,
    db::{MongoCatalogStore, MongoClient},
    server,
    storage::HttpBlobStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("muralis={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Muralis - Wallpaper Catalog API");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("MongoDB: {} (db: {})", args.mongodb_uri, args.mongodb_db);
    info!("Blob storage: {}", args.storage_url);
    info!(
        "Cache: {} entries max, page TTL {}s, category TTL {}s",
        args.cache_max_entries, args.page_cache_ttl_seconds, args.category_cache_ttl_seconds
    );
    info!("======================================");

    // Connect to MongoDB
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    // Open the wallpaper collection and apply indexes
    let store = match MongoCatalogStore::new(&mongo).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Catalog store initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    // Blob storage client for image upload and delete
    let blobs = match HttpBlobStore::new(&args.storage_url, args.storage_api_key.clone()) {
        Ok(blobs) => Arc::new(blobs),
        Err(e) => {
            error!("Blob storage client initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    // Cache, read-through wrapper, and write-side purge share one store
    let cache = Arc::new(InMemoryCache::new(args.cache_max_entries));
    let cache_store: Arc<dyn CacheStore> = cache.clone();

    let catalog = Arc::new(CatalogService::new(
        store,
        ReadThrough::new(Arc::clone(&cache_store)),
        Arc::new(CoarsePurge::new(cache_store)),
        blobs,
        args.page_cache_ttl(),
        args.category_cache_ttl(),
    ));

    let state = Arc::new(server::AppState::new(args, catalog, cache));

    // Run the server
    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
