use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::backend::CacheBackend;
use super::error::CacheError;
use super::types::CachedEmbedding;
use crate::constants::CACHE_KEY_PREFIX;

const BACKEND_NAME: &str = "redis";

/// Distributed cache backend on Redis.
///
/// Values are JSON-encoded [`CachedEmbedding`]s with a server-side TTL, so
/// expiry needs no sweeper. The `ConnectionManager` reconnects on failure.
pub struct RedisCacheBackend {
    conn: ConnectionManager,
    ttl: Duration,
}

impl RedisCacheBackend {
    /// Connects to `url` and verifies the connection with a `PING`.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, CacheError> {
        info!(url, "Connecting to Redis cache backend");

        let client = redis::Client::open(url).map_err(Self::backend_error)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(Self::backend_error)?;

        let mut conn = manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::backend_error)?;

        info!("Redis cache backend ready");
        Ok(Self { conn: manager, ttl })
    }

    fn backend_error(e: redis::RedisError) -> CacheError {
        CacheError::Backend {
            backend: BACKEND_NAME,
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn get(&self, key: &str) -> Result<Option<CachedEmbedding>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await.map_err(Self::backend_error)?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, entry: &CachedEmbedding) -> Result<(), CacheError> {
        let json = serde_json::to_string(entry)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, json, self.ttl.as_secs())
            .await
            .map_err(Self::backend_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(Self::backend_error)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let pattern = format!("{CACHE_KEY_PREFIX}*");
        let mut scan_conn = self.conn.clone();

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = scan_conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(Self::backend_error)?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(Self::backend_error)?;
        Ok(())
    }
}
