//! In-process cache backend.
//!
//! A bounded `moka` cache with per-entry expiry. Used when no Redis endpoint is configured.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::backend::CacheBackend;
use super::error::CacheResult;
use crate::constants::DEFAULT_MEMORY_CACHE_CAPACITY;

#[derive(Debug, Clone)]
struct TtlEntry {
    value: Arc<str>,
    stored_at: Instant,
    ttl: Duration,
}

impl TtlEntry {
    #[inline]
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

struct PerEntryTtl;

impl Expiry<String, TtlEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TtlEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &TtlEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// TTL-aware in-memory backend.
#[derive(Clone)]
pub struct MemoryBackend {
    entries: Cache<String, TtlEntry>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates a backend with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CACHE_CAPACITY)
    }

    /// Creates a backend holding at most `capacity` entries.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Approximate number of live entries.
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    /// True when no live entries remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Runs pending eviction work.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        // moka's expiry is lazy; never hand out an entry that outlived its TTL.
        if entry.is_expired() {
            self.entries.invalidate(key);
            return None;
        }
        Some(entry.value.to_string())
    }
}

impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.lookup(key))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let entry = TtlEntry {
            value: Arc::from(value),
            stored_at: Instant::now(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
