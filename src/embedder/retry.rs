use std::time::Duration;

use tracing::warn;

use super::error::EmbeddingError;
use super::EmbeddingClient;
use crate::config::Config;
use crate::constants::MAX_BACKOFF_SECS;

/// Retry policy for generation calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts (not retries after the first).
    pub max_attempts: u32,
    /// Base delay, scaled per failure class.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Builds the policy from engine configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries,
            retry_delay: config.retry_delay,
        }
    }

    /// Delay before the next attempt, given the failure on `attempt` (1-based).
    ///
    /// Rate limits honor the service hint when present, else exponential
    /// backoff capped at [`MAX_BACKOFF_SECS`]. Other transient errors back off
    /// linearly.
    pub fn backoff_delay(&self, error: &EmbeddingError, attempt: u32) -> Duration {
        match error {
            EmbeddingError::RateLimited {
                retry_after: Some(hint),
                ..
            } => *hint,
            EmbeddingError::RateLimited { .. } => {
                let exp = self
                    .retry_delay
                    .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
                exp.min(Duration::from_secs(MAX_BACKOFF_SECS))
            }
            _ => self.retry_delay.saturating_mul(attempt),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Decorates any [`EmbeddingClient`] with the retry policy.
pub struct RetryingClient<E> {
    inner: E,
    policy: RetryPolicy,
}

impl<E> RetryingClient<E> {
    /// Wraps `inner` with `policy`.
    pub fn new(inner: E, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the wrapped client.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Returns the active policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl<E: EmbeddingClient> EmbeddingClient for RetryingClient<E> {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut attempt = 1u32;
        loop {
            match self.inner.generate(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_delay(&e, attempt);
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Embedding attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        self.inner.health_check().await
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
