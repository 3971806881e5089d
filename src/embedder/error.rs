use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding generation service.
pub enum EmbeddingError {
    /// The service throttled the request. Retried with the service-provided
    /// hint when present, else exponential backoff.
    #[error("rate limited by embedding service: {message}")]
    RateLimited {
        /// Server-provided retry hint, if any.
        retry_after: Option<Duration>,
        /// Error message.
        message: String,
    },

    /// Transport or server-side failure. Retried with linear backoff.
    #[error("transient embedding service error: {message}")]
    Transient {
        /// Error message.
        message: String,
    },

    /// Authentication/authorization failure. Never retried.
    #[error("embedding service rejected credentials: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The service returned a vector of the wrong dimension. Never retried and
    /// never stored.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimension.
        expected: usize,
        /// Returned dimension.
        actual: usize,
    },

    /// The response body could not be interpreted. Never retried.
    #[error("invalid embedding service response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl EmbeddingError {
    /// Returns `true` for failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::RateLimited { .. } | EmbeddingError::Transient { .. }
        )
    }

    /// Returns `true` for systemic failures that should halt a run rather than
    /// fail a single entity.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            EmbeddingError::Unauthorized { .. } | EmbeddingError::DimensionMismatch { .. }
        )
    }
}
