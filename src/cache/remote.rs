//! Redis cache backend.
//!
//! A thin adapter over [`redis::aio::ConnectionManager`], which multiplexes commands on one
//! connection and reconnects on its own. The manager is created on first use, so building a
//! backend never touches the network.

use std::future::Future;
use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::debug;

use super::backend::CacheBackend;
use super::error::{CacheError, CacheResult};

/// Bound on connecting and on every command.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Cache backend storing ranked results in Redis with `SETEX` / `PSETEX`.
pub struct RedisBackend {
    client: redis::Client,
    manager: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("addr", &self.addr())
            .field("connected", &self.manager.initialized())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RedisBackend {
    /// Creates a client for `redis://[:password@]host[:port][/db]`. No connection is made until
    /// first use.
    pub fn new(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
            timeout: DEFAULT_IO_TIMEOUT,
        })
    }

    /// Overrides the connect and per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `host:port` (or socket path) of the server, for logs.
    pub fn addr(&self) -> String {
        self.client.get_connection_info().addr.to_string()
    }

    /// Returns the shared connection manager, connecting on first call.
    ///
    /// A failed connect leaves the cell empty, so the next call retries.
    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let manager = self
                    .bounded("CONNECT", ConnectionManager::new(self.client.clone()))
                    .await?;
                debug!(addr = %self.addr(), "Redis connection established");
                Ok::<_, CacheError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> CacheResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout {
                op,
                after: self.timeout,
            }),
        }
    }
}

impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        self.bounded("GET", conn.get(key)).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        if ttl.subsec_nanos() == 0 && !ttl.is_zero() {
            self.bounded("SETEX", conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()))
                .await
        } else {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            self.bounded("PSETEX", conn.pset_ex::<_, _, ()>(key, value, millis))
                .await
        }
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: String = self
            .bounded("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
