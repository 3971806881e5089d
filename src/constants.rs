//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift. The
//! embedding dimension is runtime-configurable through [`crate::config::Config`];
//! the constant here is the default and is validated against every generated
//! vector at the embedder boundary.

/// Default embedding dimension (OpenAI `text-embedding-3-small` family).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Version stamped into every [`crate::cache::EmbeddingMetadata`].
pub const EMBEDDING_VERSION: u32 = 1;

/// Cache key prefix; full keys are `embedding:{entity_id}`.
pub const CACHE_KEY_PREFIX: &str = "embedding:";

/// Primary vector namespace holding every processed session.
pub const PRIMARY_NAMESPACE: &str = "sessions";

/// Secondary namespace for sessions classified as dining-related.
pub const SECONDARY_NAMESPACE: &str = "sessions_dining";

/// Text scoring below this is skipped outright (never retried, never stored).
pub const MIN_TEXT_QUALITY: f32 = 0.3;

/// Vector quality bucket boundaries.
pub const QUALITY_HIGH_THRESHOLD: f32 = 0.9;
pub const QUALITY_MEDIUM_THRESHOLD: f32 = 0.5;

/// Text length bounds rewarded/penalized by the quality gate (chars).
pub const MIN_TEXT_LEN: usize = 50;
pub const MAX_TEXT_LEN: usize = 8000;

/// Ceiling for exponential rate-limit backoff.
pub const MAX_BACKOFF_SECS: u64 = 30;

/// Returns the cache key for an entity id.
pub fn cache_key(entity_id: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{entity_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("sess-42"), "embedding:sess-42");
    }

    #[test]
    fn test_quality_thresholds_ordered() {
        assert!(MIN_TEXT_QUALITY < QUALITY_MEDIUM_THRESHOLD);
        assert!(QUALITY_MEDIUM_THRESHOLD < QUALITY_HIGH_THRESHOLD);
    }
}
