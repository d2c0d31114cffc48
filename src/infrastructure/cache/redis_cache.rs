//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

const KEY_PREFIX: &str = "link:";

/// Redis cache for token lookups.
///
/// `ConnectionManager` reconnects on its own; a command issued while Redis is
/// down fails with [`CacheError::OperationError`] instead of blocking.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects, verifies the connection with a PING and sets the TTL used
    /// when [`CacheService::set_url`] is called without one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {e}"))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {e}"))
        })?;

        let mut conn = manager.clone();
        conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn build_key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, token: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        let cached = conn
            .get::<_, Option<String>>(Self::build_key(token))
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {token}: {e}")))?;

        match cached {
            Some(ref url) => debug!("Cache HIT: {} -> {}", token, url),
            None => debug!("Cache MISS: {}", token),
        }
        Ok(cached)
    }

    async fn set_url(
        &self,
        token: &str,
        destination: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        conn.set_ex::<_, _, ()>(Self::build_key(token), destination, ttl)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {token}: {e}")))?;

        debug!("Cache SET: {} -> {} (TTL: {}s)", token, destination, ttl);
        Ok(())
    }

    async fn invalidate(&self, token: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        let deleted = conn
            .del::<_, i32>(Self::build_key(token))
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {token}: {e}")))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", token);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_namespaced() {
        assert_eq!(RedisCache::build_key("abc-1"), "link:abc-1");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisCache::connect("not-a-redis-url", 60).await;
        assert!(matches!(result, Err(CacheError::ConnectionError(_))));
    }
}
