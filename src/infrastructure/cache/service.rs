//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Non-authoritative token -> destination cache.
///
/// Absence is normal. Implementations report backend failures as `Err` so the
/// caller can log them; the caller treats an error exactly like a miss.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the destination for a normalized token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be reached or the
    /// command fails.
    async fn get_url(&self, token: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping. `ttl_seconds = None` uses the implementation default.
    async fn set_url(
        &self,
        token: &str,
        destination: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Drops a mapping, e.g. after a link is deactivated.
    async fn invalidate(&self, token: &str) -> CacheResult<()>;

    /// Checks whether the backend responds.
    async fn health_check(&self) -> bool;
}
