use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use super::types::{InstrumentConfig, MatchOutcome};
use crate::cache::{CacheBackend, CacheStatus};
use crate::catalog::Record;
use crate::constants::CACHE_HIT_SUFFIX;
use crate::hashing::{FingerprintInput, cache_key};
use crate::matching::{MatchOptions, Query, Strategy};
use crate::metrics::{MetricsStore, QualityMetrics, SampleSet, quality};
use crate::payload;

/// A strategy wrapped with result caching and per-call metrics.
///
/// With no backend (or one that failed its startup ping) every call runs the strategy and
/// reports [`CacheStatus::Disabled`].
pub struct CachedInstrumentedMatcher<B: CacheBackend> {
    strategy: Strategy,
    cache: Option<B>,
    store: Arc<MetricsStore>,
    config: InstrumentConfig,
}

impl<B: CacheBackend> std::fmt::Debug for CachedInstrumentedMatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedInstrumentedMatcher")
            .field("label", &self.label())
            .field("cache", &self.cache.as_ref().map(|c| c.name()))
            .field("metrics", &self.store.path())
            .field("ttl", &self.config.ttl)
            .finish()
    }
}

impl<B: CacheBackend> CachedInstrumentedMatcher<B> {
    /// Wraps `strategy` without checking the backend.
    pub fn new(
        strategy: Strategy,
        cache: Option<B>,
        store: Arc<MetricsStore>,
        config: InstrumentConfig,
    ) -> Self {
        Self {
            strategy,
            cache,
            store,
            config,
        }
    }

    /// Wraps `strategy`, pinging the backend first. An unreachable backend disables caching.
    pub async fn connect(
        strategy: Strategy,
        cache: Option<B>,
        store: Arc<MetricsStore>,
        config: InstrumentConfig,
    ) -> Self {
        let cache = match cache {
            Some(backend) => match backend.ping().await {
                Ok(()) => {
                    info!(
                        label = strategy.label(),
                        backend = backend.name(),
                        "Result cache connected"
                    );
                    Some(backend)
                }
                Err(e) => {
                    warn!(
                        label = strategy.label(),
                        backend = backend.name(),
                        error = %e,
                        "Result cache unreachable, caching disabled"
                    );
                    None
                }
            },
            None => None,
        };
        Self::new(strategy, cache, store, config)
    }

    /// Label of the wrapped strategy.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.strategy.label()
    }

    /// The wrapped strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Cache backend, if caching is enabled.
    pub fn cache(&self) -> Option<&B> {
        self.cache.as_ref()
    }

    /// True when results are cached.
    #[inline]
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Metrics store receiving one sample set per call.
    pub fn store(&self) -> &Arc<MetricsStore> {
        &self.store
    }

    /// Cache settings.
    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// Ranks records for `query`, served from the cache when possible.
    #[instrument(
        skip(self, query, options),
        fields(label = self.label(), top_n = options.top_n, sort = ?options.sort_by)
    )]
    pub async fn find_matches(&self, query: &Query, options: &MatchOptions) -> MatchOutcome {
        let started = Instant::now();
        let timestamp = Utc::now().timestamp();
        let canonical = query.canonical();
        let label = self.label();

        let key = cache_key(&FingerprintInput::new(label, &canonical, options));

        if let Some(cache) = &self.cache
            && let Some(records) = self.lookup(cache, &key).await
        {
            let latency = started.elapsed();
            let quality = quality::compute(&canonical, &records);
            let hit_label = format!("{label}{CACHE_HIT_SUFFIX}");

            info!(matches = records.len(), latency_ms = latency.as_millis() as u64, "Cache hit");
            self.record(SampleSet::new(
                hit_label.as_str(),
                timestamp,
                latency.as_secs_f64(),
                quality,
            ))
            .await;

            return MatchOutcome {
                records,
                status: CacheStatus::Hit,
                latency,
                quality,
                label: hit_label,
            };
        }

        let status = if self.cache.is_some() {
            CacheStatus::Miss
        } else {
            CacheStatus::Disabled
        };

        let records = match self.strategy.find_matches(query, options).await {
            Ok(records) => records,
            Err(e) => {
                let latency = started.elapsed();
                error!(error = %e, "Strategy failed, returning no matches");
                // Recorded with zero quality, never cached.
                self.record(SampleSet::new(
                    label,
                    timestamp,
                    latency.as_secs_f64(),
                    QualityMetrics::default(),
                ))
                .await;
                return MatchOutcome {
                    records: Vec::new(),
                    status,
                    latency,
                    quality: QualityMetrics::default(),
                    label: label.to_string(),
                };
            }
        };

        let latency = started.elapsed();
        let quality = quality::compute(&canonical, &records);

        if let Some(cache) = &self.cache {
            self.store_result(cache, &key, &records).await;
        }

        debug!(
            status = %status,
            matches = records.len(),
            latency_ms = latency.as_millis() as u64,
            "Strategy executed"
        );
        self.record(SampleSet::new(label, timestamp, latency.as_secs_f64(), quality))
            .await;

        MatchOutcome {
            records,
            status,
            latency,
            quality,
            label: label.to_string(),
        }
    }

    /// Same as [`find_matches`](Self::find_matches), records only.
    pub async fn find_matches_records(&self, query: &Query, options: &MatchOptions) -> Vec<Record> {
        self.find_matches(query, options).await.records
    }

    async fn lookup(&self, cache: &B, key: &str) -> Option<Vec<Record>> {
        let raw = match cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, backend = cache.name(), error = %e, "Cache lookup failed");
                return None;
            }
        };

        match payload::decode(&raw, self.strategy.catalog()) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(key, error = %e, "Discarding unusable cached result");
                None
            }
        }
    }

    async fn store_result(&self, cache: &B, key: &str, records: &[Record]) {
        let encoded = match payload::encode(records) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode result for cache");
                return;
            }
        };

        match cache.set_ex(key, &encoded, self.config.ttl).await {
            Ok(()) => debug!(key, ttl_secs = self.config.ttl.as_secs(), "Result cached"),
            Err(e) => warn!(key, backend = cache.name(), error = %e, "Cache store failed"),
        }
    }

    async fn record(&self, samples: SampleSet) {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || store.append(&samples)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(path = %self.store.path().display(), error = %e, "Metrics append failed"),
            Err(e) => warn!(error = %e, "Metrics append task failed"),
        }
    }
}
