//! Cache contract
//!
//! Abstracts the key-value cache behind the four operations the catalog
//! uses. The cache is an accelerator only: callers must treat any key as
//! potentially absent and never rely on it as a source of truth. The
//! shipped backend is [`crate::cache::InMemoryCache`]; a networked store
//! is a drop-in trait impl.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::types::Result;

/// Key-value store with TTL-based expiry.
///
/// Errors carry [`crate::types::CatalogError::Cache`]; read-path callers
/// degrade to a live store query on error rather than surfacing it.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: Bytes, ttl: Duration) -> Result<()>;

    /// Remove `key` if present. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List every live key starting with `prefix`.
    async fn list_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
