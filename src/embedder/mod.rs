//! Embedding generator adapter.
//!
//! [`HttpEmbeddingClient`] talks to an OpenAI-compatible service;
//! [`RetryingClient`] layers the retry/backoff policy over any client. The
//! engine never calls a bare client directly.

pub mod client;
pub mod error;
pub mod retry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::HttpEmbeddingClient;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
pub use retry::{RetryPolicy, RetryingClient};

/// Minimal async interface over an embedding generation service.
pub trait EmbeddingClient: Send + Sync {
    /// Generates one embedding for `text`.
    fn generate(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Probes service reachability (pre-flight check).
    fn health_check(
        &self,
    ) -> impl std::future::Future<Output = Result<(), EmbeddingError>> + Send;

    /// Model identifier stamped into embedding metadata.
    fn model_id(&self) -> &str;

    /// Expected vector dimension.
    fn dimensions(&self) -> usize;
}
