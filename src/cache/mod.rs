//! Cache backends for ranked results.
//!
//! - [`RedisBackend`]: `redis` connection manager (`GET` / `SETEX` / `PSETEX`).
//! - [`MemoryBackend`]: in-process `moka` cache with per-entry TTL.
//! - [`CacheClient`]: either of the above, chosen at startup.
//!
//! Backend errors never reach callers of the instrumented matcher; they only turn a lookup into
//! a miss or skip a store.

pub mod backend;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod remote;
pub mod types;


pub use backend::{CacheBackend, CacheClient};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryBackend;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCacheBackend;
pub use remote::RedisBackend;
pub use types::CacheStatus;
