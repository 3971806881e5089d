use std::sync::Arc;

use tracing::{debug, instrument};

use super::backend::CacheBackend;
use super::types::CachedEmbedding;

/// Primary-with-fallback cache decorator.
///
/// Reads try the preferred (distributed) backend first and fall back on error
/// or miss; writes are best-effort on the preferred backend with a fallback
/// write on failure. Backend errors never leave this type — the pipeline only
/// ever sees hit or miss.
pub struct FallbackCache {
    primary: Arc<dyn CacheBackend>,
    fallback: Option<Arc<dyn CacheBackend>>,
}

impl FallbackCache {
    /// Single-backend composition (no fallback tier).
    pub fn new(primary: Arc<dyn CacheBackend>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Preferred backend with an in-process fallback.
    pub fn with_fallback(primary: Arc<dyn CacheBackend>, fallback: Arc<dyn CacheBackend>) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    #[instrument(skip(self), fields(key = key))]
    pub async fn get(&self, key: &str) -> Option<CachedEmbedding> {
        match self.primary.get(key).await {
            Ok(Some(entry)) => return Some(entry),
            Ok(None) => {}
            Err(e) => {
                debug!(backend = self.primary.name(), error = %e, "Cache read failed, falling back");
            }
        }

        let fallback = self.fallback.as_ref()?;
        match fallback.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                debug!(backend = fallback.name(), error = %e, "Fallback cache read failed");
                None
            }
        }
    }

    #[instrument(skip(self, entry), fields(key = key))]
    pub async fn set(&self, key: &str, entry: &CachedEmbedding) {
        match self.primary.set(key, entry).await {
            Ok(()) => return,
            Err(e) => {
                debug!(backend = self.primary.name(), error = %e, "Cache write failed, falling back");
            }
        }

        if let Some(fallback) = &self.fallback {
            if let Err(e) = fallback.set(key, entry).await {
                debug!(backend = fallback.name(), error = %e, "Fallback cache write failed");
            }
        }
    }

    /// Removes `key` from both backends.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.primary.remove(key).await {
            debug!(backend = self.primary.name(), error = %e, "Cache remove failed");
        }
        if let Some(fallback) = &self.fallback {
            if let Err(e) = fallback.remove(key).await {
                debug!(backend = fallback.name(), error = %e, "Fallback cache remove failed");
            }
        }
    }

    /// Clears both backends.
    pub async fn clear(&self) {
        if let Err(e) = self.primary.clear().await {
            debug!(backend = self.primary.name(), error = %e, "Cache clear failed");
        }
        if let Some(fallback) = &self.fallback {
            if let Err(e) = fallback.clear().await {
                debug!(backend = fallback.name(), error = %e, "Fallback cache clear failed");
            }
        }
    }
}
