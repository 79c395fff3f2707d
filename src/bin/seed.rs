//! Muralis Seeder - Populates the wallpaper collection with sample data
//!
//! Drops any existing wallpapers and inserts 20 sample wallpapers per
//! category, alternating between two static image URLs.
//!
//! Usage:
//!   muralis-seed --mongodb-uri mongodb://localhost:27017
//!
//! Environment variables:
//!   MONGODB_URI - MongoDB connection string (default: mongodb://localhost:27017)
//!   MONGODB_DB - Database name (default: muralis)

use clap::Parser;
use mongodb::bson::doc;
use muralis::db::{MongoClient, WallpaperDoc, WALLPAPER_COLLECTION};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const IMAGE_URLS: [&str; 2] = [
    "https://res.cloudinary.com/dubmozsyq/image/upload/v1732549461/m1xuy1aolrc6b5bd5pzx.jpg",
    "https://res.cloudinary.com/dubmozsyq/image/upload/v1732550569/reukbmqapdzuc7fgnmzo.jpg",
];

const CATEGORIES: [&str; 7] = [
    "Nature",
    "Architecture",
    "Animals",
    "Abstract",
    "Space",
    "Technology",
    "Art",
];

const WALLPAPERS_PER_CATEGORY: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "muralis-seed")]
#[command(about = "Seeds the Muralis wallpaper collection with sample data")]
#[command(version)]
struct Args {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "muralis")]
    mongodb_db: String,
}

fn sample_wallpapers() -> Vec<WallpaperDoc> {
    let mut wallpapers = Vec::with_capacity(CATEGORIES.len() * WALLPAPERS_PER_CATEGORY);

    for category in CATEGORIES {
        for i in 0..WALLPAPERS_PER_CATEGORY {
            let id = format!("{}_{}", category, i + 1);
            wallpapers.push(WallpaperDoc::new(
                id.clone(),
                id,
                category.to_string(),
                IMAGE_URLS[i % 2].to_string(),
            ));
        }
    }

    wallpapers
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args = Args::parse();

    info!(
        "Seeding wallpapers into {} (db: {})",
        args.mongodb_uri, args.mongodb_db
    );

    let client = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let collection = match client.collection::<WallpaperDoc>(WALLPAPER_COLLECTION).await {
        Ok(collection) => collection,
        Err(e) => {
            error!("Failed to open wallpaper collection: {}", e);
            std::process::exit(1);
        }
    };

    // Start fresh
    match collection.inner().delete_many(doc! {}).await {
        Ok(result) => info!("Removed {} existing wallpapers", result.deleted_count),
        Err(e) => {
            error!("Failed to clear wallpaper collection: {}", e);
            std::process::exit(1);
        }
    }

    let wallpapers = sample_wallpapers();
    info!("Inserting {} wallpapers...", wallpapers.len());

    match collection.inner().insert_many(&wallpapers).await {
        Ok(result) => info!(
            "Database seeded with {} sample wallpapers across {} categories",
            result.inserted_ids.len(),
            CATEGORIES.len()
        ),
        Err(e) => {
            error!("Failed to insert sample wallpapers: {}", e);
            std::process::exit(1);
        }
    }
}
