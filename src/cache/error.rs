use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by cache backends.
///
/// These never propagate out of the cache layer: the fallback decorator
/// swallows them and tries the other backend.
pub enum CacheError {
    /// Backend connection or command failure.
    #[error("cache backend '{backend}' error: {message}")]
    Backend {
        /// Backend name.
        backend: &'static str,
        /// Error message.
        message: String,
    },

    /// Stored value could not be (de)serialized.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
