use async_trait::async_trait;

use super::error::CacheError;
use super::types::CachedEmbedding;

/// Capability interface shared by the distributed and in-process backends.
///
/// Object-safe so backends compose behind the fallback decorator at runtime.
/// Expiry is backend-owned: each implementation applies its configured TTL.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Returns the entry stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<CachedEmbedding>, CacheError>;

    /// Stores `entry` under `key`.
    async fn set(&self, key: &str, entry: &CachedEmbedding) -> Result<(), CacheError>;

    /// Removes the entry under `key`.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every embedding entry.
    async fn clear(&self) -> Result<(), CacheError>;
}
