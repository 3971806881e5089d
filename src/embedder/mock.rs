use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::EmbeddingClient;

/// Scriptable embedding client for tests.
///
/// Generates deterministic, well-conditioned vectors derived from the text, so
/// the same text always embeds to the same vector and different texts do not
/// collide.
pub struct MockEmbeddingClient {
    dimensions: usize,
    model: String,
    calls: AtomicUsize,
    failures: Mutex<VecDeque<EmbeddingError>>,
    healthy: AtomicBool,
}

impl MockEmbeddingClient {
    /// Creates a mock producing vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model: "mock-embedding".to_string(),
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Number of `generate` calls made so far (including failed ones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queues an error to be returned by the next `generate` call.
    pub fn push_failure(&self, error: EmbeddingError) {
        self.failures.lock().push_back(error);
    }

    /// Queues `n` transient failures.
    pub fn fail_times(&self, n: usize) {
        let mut failures = self.failures.lock();
        for _ in 0..n {
            failures.push_back(EmbeddingError::Transient {
                message: "injected failure".to_string(),
            });
        }
    }

    /// Toggles the health-check result.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Deterministic vector for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = blake3::hash(crate::hashing::canonicalize(text).as_bytes());
        let bytes = seed.as_bytes();
        (0..self.dimensions)
            .map(|i| {
                let mixed = (bytes[i % 32] as usize).wrapping_mul(31).wrapping_add(i * 7) % 256;
                (mixed as f32 - 127.5) / 128.0
            })
            .collect()
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        Ok(self.vector_for(text))
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EmbeddingError::Transient {
                message: "mock service marked unhealthy".to_string(),
            })
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
