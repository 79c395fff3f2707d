//! Image blob storage client
//!
//! Wallpaper bytes live in an external image service; the catalog only
//! stores the id and public URL it hands back. The wallpaper `id` field
//! doubles as the blob id, so deletes address the same identifier.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::types::{CatalogError, Result};

/// A stored image as reported by the blob service
#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    pub id: String,
    pub url: String,
}

/// Client contract for the image blob service
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload an image, returning its id and public URL
    async fn upload(&self, data: Bytes, content_type: &str, name: &str) -> Result<StoredImage>;

    /// Delete an image by id. Deleting an image that is already gone
    /// succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// HTTP client for the blob service
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpBlobStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Storage(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, data: Bytes, content_type: &str, name: &str) -> Result<StoredImage> {
        let url = format!("{}/images", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .header("X-Image-Name", name)
            .body(data);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Storage(format!("Image upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CatalogError::Storage(format!(
                "Image upload returned {}",
                response.status()
            )));
        }

        let stored: StoredImage = response
            .json()
            .await
            .map_err(|e| CatalogError::Storage(format!("Invalid upload response: {}", e)))?;

        debug!("Uploaded image '{}' as '{}'", name, stored.id);
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}/images/{}", self.base_url, urlencoding::encode(id));
        let mut request = self.client.delete(&url);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Storage(format!("Image delete failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::Storage(format!(
                "Image delete returned {}",
                status
            )));
        }

        Ok(())
    }
}
