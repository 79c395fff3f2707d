//! MongoDB-backed implementation of the catalog store

use async_trait::async_trait;
use bson::{doc, Document};
use futures_util::StreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use tracing::error;

use crate::catalog::store::{CatalogStore, UpdateCounts};
use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{WallpaperDoc, WALLPAPER_COLLECTION};
use crate::types::{CatalogError, Result};

/// Catalog store over the `wallpapers` collection
pub struct MongoCatalogStore {
    collection: MongoCollection<WallpaperDoc>,
}

impl MongoCatalogStore {
    /// Open the wallpaper collection and apply its indexes
    pub async fn new(client: &MongoClient) -> Result<Self> {
        let collection = client.collection::<WallpaperDoc>(WALLPAPER_COLLECTION).await?;
        Ok(Self { collection })
    }

    async fn collect_docs(cursor: mongodb::Cursor<WallpaperDoc>) -> Vec<WallpaperDoc> {
        cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading wallpaper document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}

#[async_trait]
impl CatalogStore for MongoCatalogStore {
    async fn find_by_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<WallpaperDoc>> {
        let options = FindOptions::builder().skip(skip).limit(limit).build();
        let cursor = self
            .collection
            .inner()
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to find wallpapers: {}", e)))?;
        Ok(Self::collect_docs(cursor).await)
    }

    async fn count_by_filter(&self, filter: Document) -> Result<u64> {
        self.collection
            .inner()
            .count_documents(filter)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to count wallpapers: {}", e)))
    }

    async fn sample_random(&self, size: i64) -> Result<Vec<WallpaperDoc>> {
        let pipeline = vec![doc! { "$sample": { "size": size } }];
        let mut cursor = self
            .collection
            .inner()
            .aggregate(pipeline)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to sample wallpapers: {}", e)))?;

        let mut docs = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(raw) => match bson::from_document::<WallpaperDoc>(raw) {
                    Ok(doc) => docs.push(doc),
                    Err(e) => error!("Error decoding sampled wallpaper: {}", e),
                },
                Err(e) => error!("Error reading sampled wallpaper: {}", e),
            }
        }
        Ok(docs)
    }

    async fn group_distinct(&self, field: &str) -> Result<Vec<(String, WallpaperDoc)>> {
        // Oldest document represents each group, groups ordered by value
        let pipeline = vec![
            doc! { "$sort": { "createdAt": 1 } },
            doc! { "$group": { "_id": format!("${}", field), "item": { "$first": "$$ROOT" } } },
            doc! { "$sort": { "_id": 1 } },
        ];
        let mut cursor = self
            .collection
            .inner()
            .aggregate(pipeline)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to group wallpapers: {}", e)))?;

        let mut groups = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(row) => {
                    let value = match row.get_str("_id") {
                        Ok(v) => v.to_string(),
                        // Documents missing the field group under a null key
                        Err(_) => continue,
                    };
                    match row.get_document("item") {
                        Ok(item) => match bson::from_document::<WallpaperDoc>(item.clone()) {
                            Ok(doc) => groups.push((value, doc)),
                            Err(e) => error!("Error decoding grouped wallpaper: {}", e),
                        },
                        Err(e) => error!("Error reading grouped wallpaper: {}", e),
                    }
                }
                Err(e) => error!("Error reading group row: {}", e),
            }
        }
        Ok(groups)
    }

    async fn update_many_by_filter(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<UpdateCounts> {
        let result = self
            .collection
            .inner()
            .update_many(filter, update)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to update wallpapers: {}", e)))?;
        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_many_by_filter(&self, filter: Document) -> Result<u64> {
        let result = self
            .collection
            .inner()
            .delete_many(filter)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to delete wallpapers: {}", e)))?;
        Ok(result.deleted_count)
    }

    async fn insert_one(&self, wallpaper: WallpaperDoc) -> Result<WallpaperDoc> {
        let mut wallpaper = wallpaper;
        let result = self
            .collection
            .inner()
            .insert_one(&wallpaper)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to insert wallpaper: {}", e)))?;
        wallpaper._id = result.inserted_id.as_object_id();
        Ok(wallpaper)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<WallpaperDoc>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .inner()
            .find_one_and_update(filter, update)
            .with_options(options)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to update wallpaper: {}", e)))
    }

    async fn find_one_and_delete(&self, filter: Document) -> Result<Option<WallpaperDoc>> {
        self.collection
            .inner()
            .find_one_and_delete(filter)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to delete wallpaper: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running MongoDB instance.
    // The aggregation pipelines and option wiring are exercised against
    // the in-memory store fake in the catalog service tests.
}
