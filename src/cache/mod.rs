//! Dual-backend embedding cache.
//!
//! A distributed [`RedisCacheBackend`] is preferred, with an in-process
//! [`LocalCacheBackend`] fallback, composed through [`FallbackCache`]. Validity
//! of an entry combines checksum drift, staleness against the entity's
//! `last_updated`, and age against the refresh interval — see
//! [`EmbeddingMetadata::validity`].

pub mod backend;
pub mod error;
pub mod fallback;
pub mod local;
pub mod redis;
pub mod types;


pub use backend::CacheBackend;
pub use error::CacheError;
pub use fallback::FallbackCache;
pub use local::LocalCacheBackend;
pub use redis::RedisCacheBackend;
pub use types::{CacheValidity, CachedEmbedding, EmbeddingMetadata, EmbeddingRecord};
