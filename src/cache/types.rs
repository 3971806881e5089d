use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stamped onto every generated embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMetadata {
    /// Record format version ([`crate::constants::EMBEDDING_VERSION`]).
    pub version: u32,
    /// Text quality score at generation time.
    pub quality_score: f32,
    /// Length of the embedded text (chars).
    pub text_length: usize,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Model that produced the vector.
    pub model_id: String,
    /// Vector dimension.
    pub dimensions: usize,
    /// Checksum of the canonicalized source text.
    pub checksum: String,
}

/// A generated embedding plus its metadata.
///
/// Regeneration replaces the whole record; fields are never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Catalog entity id.
    pub entity_id: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// Generation metadata.
    pub metadata: EmbeddingMetadata,
}

/// Cache entry: the record plus the time it was written to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEmbedding {
    /// The cached record.
    pub record: EmbeddingRecord,
    /// When the entry was stored.
    pub stored_at: DateTime<Utc>,
}

impl CachedEmbedding {
    /// Wraps a record with the current timestamp.
    pub fn new(record: EmbeddingRecord) -> Self {
        Self {
            record,
            stored_at: Utc::now(),
        }
    }
}

/// Outcome of a cache validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheValidity {
    /// Checksum, staleness and age all pass.
    Valid,
    /// The current text no longer matches the cached checksum.
    ChecksumMismatch,
    /// The entity was updated after the embedding was generated.
    Stale,
    /// The embedding is older than the refresh interval.
    Expired,
}

impl CacheValidity {
    /// Returns `true` only for [`CacheValidity::Valid`].
    pub fn is_valid(self) -> bool {
        matches!(self, CacheValidity::Valid)
    }
}

impl EmbeddingMetadata {
    /// Checks this record against the entity's current state.
    ///
    /// A cached record is valid only if the checksum still matches the current
    /// text, the record postdates the entity's `last_updated`, and the record
    /// is younger than `refresh_interval`.
    pub fn validity(
        &self,
        current_checksum: &str,
        last_updated: DateTime<Utc>,
        now: DateTime<Utc>,
        refresh_interval: std::time::Duration,
    ) -> CacheValidity {
        if self.checksum != current_checksum {
            return CacheValidity::ChecksumMismatch;
        }

        if self.generated_at < last_updated {
            return CacheValidity::Stale;
        }

        let max_age =
            chrono::Duration::from_std(refresh_interval).unwrap_or(chrono::Duration::MAX);
        if now - self.generated_at >= max_age {
            return CacheValidity::Expired;
        }

        CacheValidity::Valid
    }
}
