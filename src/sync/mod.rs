//! Batch synchronization engine.
//!
//! [`SyncEngine`] orchestrates the full pipeline: fetch catalog entities,
//! check the cache, gate on text quality, generate embeddings with retry,
//! write to both vector namespaces, and persist durable backups. Batches run
//! sequentially with a configurable delay; entities within a batch run
//! concurrently with in-flight deduplication.

mod engine;
mod error;
mod metrics;
mod options;

pub use engine::SyncEngine;
pub use error::SyncError;
pub use metrics::{
    ErrorRecord, ProcessingMetrics, QualityHistogram, ValidationIssue, ValidationReport,
};
pub use options::{NamespaceSelection, SyncOptions};
