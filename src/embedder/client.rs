use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;
use super::EmbeddingClient;
use crate::config::Config;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible embedding service client.
pub struct HttpEmbeddingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

impl HttpEmbeddingClient {
    /// Creates a client for the configured service.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.embedding_api_url.trim_end_matches('/').to_string(),
            api_key: config.embedding_api_key.clone(),
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dim,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn classify_status(
        status: reqwest::StatusCode,
        retry_after: Option<Duration>,
        body: String,
    ) -> EmbeddingError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return EmbeddingError::RateLimited {
                retry_after,
                message: body,
            };
        }

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return EmbeddingError::Unauthorized { message: body };
        }

        if status.is_server_error() {
            return EmbeddingError::Transient {
                message: format!("{status}: {body}"),
            };
        }

        EmbeddingError::InvalidResponse {
            message: format!("{status}: {body}"),
        }
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

impl EmbeddingClient for HttpEmbeddingClient {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .authorize(self.http.post(format!("{}/embeddings", self.base_url)))
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Transient {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(&response);
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, retry_after, body));
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                message: "response contained no embeddings".to_string(),
            })?;

        if vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        debug!(dimensions = vector.len(), "Generated embedding");
        Ok(vector)
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        let response = self
            .authorize(self.http.get(format!("{}/models", self.base_url)))
            .send()
            .await
            .map_err(|e| EmbeddingError::Transient {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let retry_after = parse_retry_after(&response);
        let body = response.text().await.unwrap_or_default();
        Err(Self::classify_status(status, retry_after, body))
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
