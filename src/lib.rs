//! Researcher matching library (used by the CLI binary and integration tests).
//!
//! A [`Catalog`] of researcher profiles is ranked against a free-text research query by one of
//! four strategies ([`Strategy`]): keyword overlap, TF-IDF cosine, averaged word-embedding
//! cosine, or an external ranking oracle. [`CachedInstrumentedMatcher`] wraps a strategy with a
//! TTL result cache and appends per-call latency and quality samples to a [`MetricsStore`].
//!
//! ## Modules
//! - [`catalog`]: loading and normalizing researcher records
//! - [`text`], [`vectorize`]: preprocessing, TF-IDF and word embeddings
//! - [`matching`], [`citation`]: ranking strategies and the citation re-sort
//! - [`cache`], [`payload`], [`hashing`]: cache backends, stored payloads, cache keys
//! - [`instrument`], [`metrics`]: the caching/telemetry wrapper and the metrics history
//! - [`config`]: `RESEARCHMATCH_*` environment configuration
//!
//! ## Test/Mock Support
//! [`MockCacheBackend`] and [`MockOracle`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod catalog;
pub mod citation;
pub mod config;
pub mod constants;
pub mod hashing;
pub mod instrument;
pub mod matching;
pub mod metrics;
pub mod payload;
pub mod text;
pub mod vectorize;

#[cfg(any(test, feature = "mock"))]
pub use cache::MockCacheBackend;
pub use cache::{CacheBackend, CacheClient, CacheError, CacheStatus, MemoryBackend, RedisBackend};
pub use catalog::{Catalog, CatalogError, Record, Statistics};
pub use citation::{CitationSorter, CitationWeights, SortMetric};
pub use config::{CacheSetting, Config, ConfigError};
pub use hashing::{FingerprintInput, cache_key, fingerprint};
pub use instrument::{CachedInstrumentedMatcher, InstrumentConfig, MatchOutcome};
#[cfg(any(test, feature = "mock"))]
pub use matching::MockOracle;
pub use matching::{
    EmbeddingMatcher, GenaiOracle, KeywordMatcher, MatchError, MatchOptions, OracleMatcher, Query,
    RankingOracle, Strategy, StrategyKind, TfidfMatcher,
};
pub use metrics::{MetricKind, MetricsError, MetricsHistory, MetricsStore, QualityMetrics};
pub use payload::PayloadError;
pub use text::Preprocessor;
pub use vectorize::{EmbeddingConfig, EmbeddingVectorizer, TfidfVectorizer};
