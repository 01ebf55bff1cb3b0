use std::time::Duration;

use crate::cache::CacheStatus;
use crate::catalog::Record;
use crate::constants::DEFAULT_CACHE_TTL_SECS;
use crate::metrics::QualityMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentConfig {
    /// Expiry of stored ranked results.
    pub ttl: Duration,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl InstrumentConfig {
    /// Config with the given result TTL.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Config with a TTL of `secs` seconds.
    pub fn with_ttl_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

/// Result of one instrumented call.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub records: Vec<Record>,
    pub status: CacheStatus,
    /// Wall time until the records were available.
    pub latency: Duration,
    pub quality: QualityMetrics,
    /// Label the metrics were recorded under; carries the hit suffix on cache hits.
    pub label: String,
}

impl MatchOutcome {
    /// True when served from the cache.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.status.is_hit()
    }

    /// Number of returned records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were returned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
