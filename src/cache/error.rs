use std::time::Duration;

use thiserror::Error;

/// Errors returned by a cache backend.
///
/// Never surfaced past the instrumented matcher: every variant degrades to a miss or to an
/// uncached result.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Connection, protocol or server error reported by the Redis client.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The backend did not answer within the configured bound.
    #[error("cache {op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// I/O failure talking to the backend.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
