//! Scriptable in-memory backend for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::backend::CacheBackend;
use super::error::{CacheError, CacheResult};

#[derive(Debug, Default)]
struct MockState {
    entries: Mutex<HashMap<String, (String, Instant, Duration)>>,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_ping: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

/// Cache backend with failure toggles and call counters. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockCacheBackend {
    state: Arc<MockState>,
}

impl MockCacheBackend {
    /// Creates an empty, reachable mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `ping` fails, as if the server were down at startup.
    pub fn unreachable() -> Self {
        let backend = Self::default();
        backend.state.fail_ping.store(true, Ordering::SeqCst);
        backend.state.fail_get.store(true, Ordering::SeqCst);
        backend.state.fail_set.store(true, Ordering::SeqCst);
        backend
    }

    /// Makes every `get` fail with an injected error.
    pub fn set_fail_get(&self, fail: bool) {
        self.state.fail_get.store(fail, Ordering::SeqCst);
    }

    /// Makes every `set_ex` fail with an injected error.
    pub fn set_fail_set(&self, fail: bool) {
        self.state.fail_set.store(fail, Ordering::SeqCst);
    }

    /// Stores `value` verbatim with a one-hour TTL, bypassing the failure toggles.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.state.entries.lock().insert(
            key.to_string(),
            (value.to_string(), Instant::now(), Duration::from_secs(3600)),
        );
    }

    /// Raw stored value, ignoring expiry.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.state.entries.lock().get(key).map(|(v, _, _)| v.clone())
    }

    /// Marks every entry as expired.
    pub fn expire_all(&self) {
        for (_, (_, _, ttl)) in self.state.entries.lock().iter_mut() {
            *ttl = Duration::ZERO;
        }
    }

    /// Stored keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.state.entries.lock().keys().cloned().collect()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.state.entries.lock().len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.state.entries.lock().is_empty()
    }

    /// Number of `get` calls so far.
    pub fn get_calls(&self) -> usize {
        self.state.gets.load(Ordering::SeqCst)
    }

    /// Number of `set_ex` calls so far.
    pub fn set_calls(&self) -> usize {
        self.state.sets.load(Ordering::SeqCst)
    }

    fn injected(what: &str) -> CacheError {
        CacheError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            format!("mock {what} failure"),
        ))
    }
}

impl CacheBackend for MockCacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.state.gets.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_get.load(Ordering::SeqCst) {
            return Err(Self::injected("GET"));
        }
        let entries = self.state.entries.lock();
        Ok(entries
            .get(key)
            .filter(|(_, stored_at, ttl)| stored_at.elapsed() < *ttl)
            .map(|(v, _, _)| v.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.state.sets.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_set.load(Ordering::SeqCst) {
            return Err(Self::injected("SET"));
        }
        self.state
            .entries
            .lock()
            .insert(key.to_string(), (value.to_string(), Instant::now(), ttl));
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        if self.state.fail_ping.load(Ordering::SeqCst) {
            return Err(Self::injected("PING"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
