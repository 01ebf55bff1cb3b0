//! Cross-cutting, shared constants.
//!
//! Runtime overrides live in [`crate::config::Config`]; these are the defaults it falls back to.

/// Default number of matches returned per call.
pub const NUM_MATCHES: usize = 10;

/// Default lifetime of a cached ranked result (one hour).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Prefix of every cache key written by the instrumented matcher.
pub const CACHE_KEY_PREFIX: &str = "matcher_cache";

/// Suffix appended to a strategy label when the result came from cache.
pub const CACHE_HIT_SUFFIX: &str = " (Cache Hit)";

/// Literal used in the fingerprint when no sort metric was requested.
pub const NO_SORT_METRIC: &str = "None";

/// Trailing window used by the rolling dashboard statistics.
pub const ROLLING_WINDOW: usize = 1000;

/// Epsilon added to the cosine denominator by the embedding strategy.
pub const EMBEDDING_COSINE_EPSILON: f32 = 1e-8;

/// Default word-embedding dimensionality.
pub const DEFAULT_EMBEDDING_DIM: usize = 100;

/// Default number of catalog entries listed in an oracle prompt.
pub const DEFAULT_ORACLE_LISTING_LIMIT: usize = 200;

/// Research-area text per listed entry is cut to this many chars in oracle prompts.
pub const ORACLE_AREA_TEXT_LIMIT: usize = 200;

/// Capacity of the in-process cache backend.
pub const DEFAULT_MEMORY_CACHE_CAPACITY: u64 = 10_000;
