use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;

use super::backend::CacheBackend;
use super::error::CacheError;
use super::types::CachedEmbedding;

const BACKEND_NAME: &str = "local";

/// In-process fallback cache backend.
///
/// Bounded LRU with a TTL, used when Redis is unconfigured or unreachable.
/// Entries here are lost on restart, which is acceptable: the vector store
/// remains the durable copy and regeneration is idempotent.
pub struct LocalCacheBackend {
    entries: Cache<String, CachedEmbedding>,
}

impl LocalCacheBackend {
    const DEFAULT_CAPACITY: u64 = 10_000;

    /// Creates a backend with the default capacity and `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY, ttl)
    }

    /// Creates a backend with a max entry capacity and `ttl`.
    pub fn with_capacity(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for LocalCacheBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn get(&self, key: &str) -> Result<Option<CachedEmbedding>, CacheError> {
        Ok(self.entries.get(key))
    }

    async fn set(&self, key: &str, entry: &CachedEmbedding) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.invalidate(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.invalidate_all();
        Ok(())
    }
}
