//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RESEARCHMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::citation::{CitationSorter, CitationWeights, SortMetric};
use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_EMBEDDING_DIM, DEFAULT_ORACLE_LISTING_LIMIT, NUM_MATCHES,
};
use crate::instrument::InstrumentConfig;
use crate::matching::{DEFAULT_ORACLE_MODEL, MatchOptions};
use crate::vectorize::EmbeddingConfig;

/// Where ranked results are cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSetting {
    /// In-process backend (the default when no URL is set).
    Memory,
    /// Remote backend at the given `redis://` URL.
    Redis(String),
    /// No caching at all.
    Disabled,
}

/// Matcher configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RESEARCHMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Researcher catalog (JSON array). Default: `public/results.json`.
    pub catalog_path: PathBuf,

    /// Metrics history document. Default: `dashboard/matching_metrics.json`.
    pub metrics_path: PathBuf,

    /// Result cache backend. Default: [`CacheSetting::Memory`].
    pub cache: CacheSetting,

    /// Lifetime of cached results. Default: one hour.
    pub cache_ttl: Duration,

    /// Matches per call. Default: `10`.
    pub top_n: usize,

    /// Citation sort applied when the caller asks for none. Default: unset.
    pub default_sort: Option<SortMetric>,

    pub embedding_dim: usize,
    pub embedding_epochs: usize,
    pub embedding_seed: u64,

    /// Weights of the custom citation score. Default: `1.0,1.0,1.0`.
    pub citation_weights: CitationWeights,

    /// Model name passed to the oracle client. Default: `deepseek-chat`.
    pub oracle_model: String,

    /// Catalog entries listed per oracle prompt. Default: `200`.
    pub oracle_listing_limit: usize,
}

pub const DEFAULT_CATALOG_PATH: &str = "public/results.json";
pub const DEFAULT_METRICS_PATH: &str = "dashboard/matching_metrics.json";

impl Default for Config {
    fn default() -> Self {
        let embedding = EmbeddingConfig::default();
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            metrics_path: PathBuf::from(DEFAULT_METRICS_PATH),
            cache: CacheSetting::Memory,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            top_n: NUM_MATCHES,
            default_sort: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_epochs: embedding.epochs,
            embedding_seed: embedding.seed,
            citation_weights: CitationWeights::default(),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            oracle_listing_limit: DEFAULT_ORACLE_LISTING_LIMIT,
        }
    }
}

impl Config {
    const ENV_CATALOG_PATH: &'static str = "RESEARCHMATCH_CATALOG_PATH";
    const ENV_METRICS_PATH: &'static str = "RESEARCHMATCH_METRICS_PATH";
    const ENV_REDIS_URL: &'static str = "RESEARCHMATCH_REDIS_URL";
    const ENV_CACHE_TTL_SECS: &'static str = "RESEARCHMATCH_CACHE_TTL_SECS";
    const ENV_TOP_N: &'static str = "RESEARCHMATCH_TOP_N";
    const ENV_SORT_BY: &'static str = "RESEARCHMATCH_SORT_BY";
    const ENV_EMBEDDING_DIM: &'static str = "RESEARCHMATCH_EMBEDDING_DIM";
    const ENV_EMBEDDING_EPOCHS: &'static str = "RESEARCHMATCH_EMBEDDING_EPOCHS";
    const ENV_EMBEDDING_SEED: &'static str = "RESEARCHMATCH_EMBEDDING_SEED";
    const ENV_CITATION_WEIGHTS: &'static str = "RESEARCHMATCH_CITATION_WEIGHTS";
    const ENV_ORACLE_MODEL: &'static str = "RESEARCHMATCH_ORACLE_MODEL";
    const ENV_ORACLE_LISTING_LIMIT: &'static str = "RESEARCHMATCH_ORACLE_LISTING_LIMIT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let metrics_path = Self::parse_path_from_env(Self::ENV_METRICS_PATH, defaults.metrics_path);
        let cache = Self::parse_cache_from_env();
        let cache_ttl = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_CACHE_TTL_SECS,
            DEFAULT_CACHE_TTL_SECS,
            1,
        )?);
        let top_n = Self::parse_number_from_env(Self::ENV_TOP_N, defaults.top_n, 1)?;
        let default_sort = Self::parse_sort_from_env()?;
        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim, 1)?;
        let embedding_epochs =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_EPOCHS, defaults.embedding_epochs, 1)?;
        let embedding_seed =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_SEED, defaults.embedding_seed, 0)?;
        let citation_weights = Self::parse_weights_from_env(defaults.citation_weights)?;
        let oracle_model = Self::parse_string_from_env(Self::ENV_ORACLE_MODEL, defaults.oracle_model);
        let oracle_listing_limit = Self::parse_number_from_env(
            Self::ENV_ORACLE_LISTING_LIMIT,
            defaults.oracle_listing_limit,
            1,
        )?;

        Ok(Self {
            catalog_path,
            metrics_path,
            cache,
            cache_ttl,
            top_n,
            default_sort,
            embedding_dim,
            embedding_epochs,
            embedding_seed,
            citation_weights,
            oracle_model,
            oracle_listing_limit,
        })
    }

    /// Checks the default match options and that the catalog file exists. The metrics file is
    /// created on first append.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.match_options()
            .validate()
            .map_err(|e| ConfigError::InvalidNumber {
                name: Self::ENV_TOP_N,
                value: self.top_n.to_string(),
                reason: e.to_string(),
            })?;

        if !self.catalog_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.catalog_path.clone(),
            });
        }
        if !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }
        Ok(())
    }

    /// Default options for a query: configured `top_n` and sort, descending.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            top_n: self.top_n,
            sort_by: self.default_sort,
            descending: true,
        }
    }

    /// Cache TTL for the instrumented matcher.
    pub fn instrument_config(&self) -> InstrumentConfig {
        InstrumentConfig::new(self.cache_ttl)
    }

    /// Training parameters for the embedding strategy.
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig::default()
            .with_dim(self.embedding_dim)
            .with_epochs(self.embedding_epochs)
            .with_seed(self.embedding_seed)
    }

    /// Sorter using the configured citation weights.
    pub fn citation_sorter(&self) -> CitationSorter {
        CitationSorter::with_weights(self.citation_weights)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_cache_from_env() -> CacheSetting {
        match env::var(Self::ENV_REDIS_URL) {
            Ok(value) => match value.trim() {
                "" => CacheSetting::Memory,
                v if v.eq_ignore_ascii_case("off") => CacheSetting::Disabled,
                v => CacheSetting::Redis(v.to_string()),
            },
            Err(_) => CacheSetting::Memory,
        }
    }

    fn parse_number_from_env<T>(name: &'static str, default: T, min: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + std::fmt::Display,
        T::Err: std::fmt::Display,
    {
        let Ok(value) = env::var(name) else {
            return Ok(default);
        };
        let parsed: T = value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidNumber {
            name,
            value: value.clone(),
            reason: e.to_string(),
        })?;
        if parsed < min {
            return Err(ConfigError::InvalidNumber {
                name,
                value,
                reason: format!("must be at least {min}"),
            });
        }
        Ok(parsed)
    }

    fn parse_sort_from_env() -> Result<Option<SortMetric>, ConfigError> {
        match env::var(Self::ENV_SORT_BY) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) if value.trim().eq_ignore_ascii_case("none") => Ok(None),
            Ok(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidSortMetric {
                    name: Self::ENV_SORT_BY,
                    value,
                }),
            Err(_) => Ok(None),
        }
    }

    /// Parses `citations,h_index,i10_index`.
    fn parse_weights_from_env(default: CitationWeights) -> Result<CitationWeights, ConfigError> {
        let Ok(value) = env::var(Self::ENV_CITATION_WEIGHTS) else {
            return Ok(default);
        };
        let invalid = |reason: String| ConfigError::InvalidNumber {
            name: Self::ENV_CITATION_WEIGHTS,
            value: value.clone(),
            reason,
        };

        let parts = value
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [c, h, i] if parts.iter().all(|w| w.is_finite()) => Ok(CitationWeights::new(*c, *h, *i)),
            [_, _, _] => Err(invalid("weights must be finite".to_string())),
            _ => Err(invalid(format!("expected 3 weights, got {}", parts.len()))),
        }
    }
}
