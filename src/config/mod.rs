//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CONFSYNC_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CONFSYNC_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Redis endpoint URL for the distributed cache backend. When unset the
    /// engine runs on the in-process fallback cache alone.
    pub redis_url: Option<String>,

    /// Base URL of the embedding generation service (OpenAI-compatible).
    pub embedding_api_url: String,

    /// API key for the embedding service, if it requires one.
    pub embedding_api_key: Option<String>,

    /// Embedding model identifier. Default: `text-embedding-3-small`.
    pub embedding_model: String,

    /// Expected embedding dimension. Default: `1536`.
    pub embedding_dim: usize,

    /// Entities per batch; also the bound on concurrent in-flight entities.
    /// Default: `10`.
    pub batch_size: usize,

    /// Pause between consecutive batches (rate-limit headroom). Default: `1s`.
    pub batch_delay: Duration,

    /// Maximum generation attempts per entity. Default: `3`.
    pub max_retries: u32,

    /// Base delay for transient-error retries. Default: `1s`.
    pub retry_delay: Duration,

    /// TTL for distributed cache entries. Default: one week.
    pub cache_ttl: Duration,

    /// Maximum age of a cached embedding before it is considered expired.
    /// Default: one week.
    pub refresh_interval: Duration,

    /// Auto-sync daemon tick interval. Default: one hour.
    pub auto_sync_interval: Duration,

    /// Drift threshold (`invalid + missing`) above which a daemon tick triggers
    /// a self-healing full resync. Default: `10`.
    pub heal_threshold: usize,
}

/// Default Qdrant URL used when `CONFSYNC_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default embedding service URL (OpenAI API).
pub const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            redis_url: None,
            embedding_api_url: DEFAULT_EMBEDDING_API_URL.to_string(),
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            batch_size: 10,
            batch_delay: Duration::from_secs(1),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(7 * 24 * 3600),
            refresh_interval: Duration::from_secs(7 * 24 * 3600),
            auto_sync_interval: Duration::from_secs(3600),
            heal_threshold: 10,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "CONFSYNC_QDRANT_URL";
    const ENV_REDIS_URL: &'static str = "CONFSYNC_REDIS_URL";
    const ENV_EMBEDDING_API_URL: &'static str = "CONFSYNC_EMBEDDING_API_URL";
    const ENV_EMBEDDING_API_KEY: &'static str = "CONFSYNC_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "CONFSYNC_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "CONFSYNC_EMBEDDING_DIM";
    const ENV_BATCH_SIZE: &'static str = "CONFSYNC_BATCH_SIZE";
    const ENV_BATCH_DELAY_MS: &'static str = "CONFSYNC_BATCH_DELAY_MS";
    const ENV_MAX_RETRIES: &'static str = "CONFSYNC_MAX_RETRIES";
    const ENV_RETRY_DELAY_MS: &'static str = "CONFSYNC_RETRY_DELAY_MS";
    const ENV_CACHE_TTL_SECS: &'static str = "CONFSYNC_CACHE_TTL_SECS";
    const ENV_REFRESH_INTERVAL_SECS: &'static str = "CONFSYNC_REFRESH_INTERVAL_SECS";
    const ENV_AUTO_SYNC_INTERVAL_SECS: &'static str = "CONFSYNC_AUTO_SYNC_INTERVAL_SECS";
    const ENV_HEAL_THRESHOLD: &'static str = "CONFSYNC_HEAL_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let qdrant_url = Self::parse_string(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let redis_url = Self::parse_optional_string(Self::ENV_REDIS_URL);
        let embedding_api_url =
            Self::parse_string(Self::ENV_EMBEDDING_API_URL, defaults.embedding_api_url);
        let embedding_api_key = Self::parse_optional_string(Self::ENV_EMBEDDING_API_KEY);
        let embedding_model =
            Self::parse_string(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim =
            Self::parse_usize(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let batch_size = Self::parse_usize(Self::ENV_BATCH_SIZE, defaults.batch_size)?;
        let batch_delay =
            Self::parse_duration_ms(Self::ENV_BATCH_DELAY_MS, defaults.batch_delay)?;
        let max_retries = Self::parse_u32(Self::ENV_MAX_RETRIES, defaults.max_retries)?;
        let retry_delay =
            Self::parse_duration_ms(Self::ENV_RETRY_DELAY_MS, defaults.retry_delay)?;
        let cache_ttl = Self::parse_duration_secs(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl)?;
        let refresh_interval = Self::parse_duration_secs(
            Self::ENV_REFRESH_INTERVAL_SECS,
            defaults.refresh_interval,
        )?;
        let auto_sync_interval = Self::parse_duration_secs(
            Self::ENV_AUTO_SYNC_INTERVAL_SECS,
            defaults.auto_sync_interval,
        )?;
        let heal_threshold =
            Self::parse_usize(Self::ENV_HEAL_THRESHOLD, defaults.heal_threshold)?;

        Ok(Self {
            qdrant_url,
            redis_url,
            embedding_api_url,
            embedding_api_key,
            embedding_model,
            embedding_dim,
            batch_size,
            batch_delay,
            max_retries,
            retry_delay,
            cache_ttl,
            refresh_interval,
            auto_sync_interval,
            heal_threshold,
        })
    }

    /// Validates basic invariants (does not probe any service).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: Self::ENV_BATCH_SIZE,
                value: "0".to_string(),
                reason: "batch size must be at least 1",
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                var: Self::ENV_EMBEDDING_DIM,
                value: "0".to_string(),
                reason: "embedding dimension must be non-zero",
            });
        }

        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                var: Self::ENV_MAX_RETRIES,
                value: "0".to_string(),
                reason: "at least one attempt is required",
            });
        }

        Ok(())
    }

    fn parse_string(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                var: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u32(var_name: &'static str, default: u32) -> Result<u32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                var: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_duration_ms(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let ms: u64 = value.parse().map_err(|e| ConfigError::IntParseError {
                    var: var_name,
                    value,
                    source: e,
                })?;
                Ok(Duration::from_millis(ms))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_duration_secs(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let secs: u64 = value.parse().map_err(|e| ConfigError::IntParseError {
                    var: var_name,
                    value,
                    source: e,
                })?;
                Ok(Duration::from_secs(secs))
            }
            Err(_) => Ok(default),
        }
    }
}
