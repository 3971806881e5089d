//! Confsync: embedding synchronization and caching for a conference catalog.
//!
//! The crate keeps a vector store in lockstep with a mutable session catalog.
//! One [`SyncEngine`] per deployment drives the pipeline: fetch entities,
//! check the cache for checksum or staleness drift, gate low-signal text,
//! generate embeddings with retry and backoff, write to the primary and
//! dining vector namespaces, and persist a durable vector backup.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`SyncEngine`], [`SyncOptions`], [`SyncError`] - Batch synchronization
//! - [`ProcessingMetrics`], [`ValidationReport`] - Run observability
//! - [`AutoSyncDaemon`] - Periodic incremental sync and self-healing
//!
//! ## Cache
//! - [`FallbackCache`] - Distributed backend with in-process fallback
//! - [`RedisCacheBackend`], [`LocalCacheBackend`] - The two backends
//! - [`CachedEmbedding`], [`CacheValidity`] - Storage format and validity
//!
//! ## Generation & Quality
//! - [`HttpEmbeddingClient`], [`RetryingClient`] - Embedding generation
//! - [`score_text`], [`score_vector`], [`QualityBucket`] - Quality scoring
//!
//! ## Vector Store & Catalog
//! - [`QdrantClient`], [`VectorStoreWriter`] - Namespace writes
//! - [`CatalogStore`], [`Session`] - Catalog access
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod embedder;
pub mod hashing;
pub mod quality;
pub mod sync;
pub mod vectordb;
pub mod writer;

pub use cache::{
    CacheBackend, CacheError, CacheValidity, CachedEmbedding, EmbeddingMetadata, EmbeddingRecord,
    FallbackCache, LocalCacheBackend, RedisCacheBackend,
};
pub use catalog::{CatalogError, CatalogStore, Session};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockCatalogStore;
pub use config::{Config, ConfigError};
pub use constants::{
    CACHE_KEY_PREFIX, DEFAULT_EMBEDDING_DIM, EMBEDDING_VERSION, MIN_TEXT_QUALITY,
    PRIMARY_NAMESPACE, SECONDARY_NAMESPACE, cache_key,
};
pub use daemon::AutoSyncDaemon;
pub use embedder::{
    EmbeddingClient, EmbeddingError, HttpEmbeddingClient, RetryPolicy, RetryingClient,
};
#[cfg(any(test, feature = "mock"))]
pub use embedder::MockEmbeddingClient;
pub use hashing::{canonicalize, checksum_text, point_id};
pub use quality::{QualityBucket, score_text, score_vector};
pub use sync::{
    ErrorRecord, NamespaceSelection, ProcessingMetrics, QualityHistogram, SyncEngine, SyncError,
    SyncOptions, ValidationIssue, ValidationReport,
};
pub use vectordb::{QdrantClient, SessionPayload, SessionPoint, VectorDbClient, VectorDbError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorDbClient;
pub use writer::{VectorStoreWriter, is_dining_related};
