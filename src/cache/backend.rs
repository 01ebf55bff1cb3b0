use std::future::Future;
use std::time::Duration;

use super::error::CacheResult;
use super::memory::MemoryBackend;
use super::remote::RedisBackend;

/// Key-value store with per-entry expiry, used to memoize ranked results.
///
/// Implementations must never serve an entry past its TTL.
pub trait CacheBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    /// Stores `value` under `key` for `ttl`, replacing any previous value.
    fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Checks that the backend is reachable.
    fn ping(&self) -> impl Future<Output = CacheResult<()>> + Send;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Runtime-selected backend.
#[derive(Debug)]
pub enum CacheClient {
    Redis(RedisBackend),
    Memory(MemoryBackend),
}

impl From<RedisBackend> for CacheClient {
    fn from(backend: RedisBackend) -> Self {
        CacheClient::Redis(backend)
    }
}

impl From<MemoryBackend> for CacheClient {
    fn from(backend: MemoryBackend) -> Self {
        CacheClient::Memory(backend)
    }
}

impl CacheBackend for CacheClient {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            CacheClient::Redis(b) => b.get(key).await,
            CacheClient::Memory(b) => b.get(key).await,
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            CacheClient::Redis(b) => b.set_ex(key, value, ttl).await,
            CacheClient::Memory(b) => b.set_ex(key, value, ttl).await,
        }
    }

    async fn ping(&self) -> CacheResult<()> {
        match self {
            CacheClient::Redis(b) => b.ping().await,
            CacheClient::Memory(b) => b.ping().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CacheClient::Redis(b) => b.name(),
            CacheClient::Memory(b) => b.name(),
        }
    }
}
