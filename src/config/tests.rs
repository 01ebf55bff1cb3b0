use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

const VARS: [&str; 12] = [
    "RESEARCHMATCH_CATALOG_PATH",
    "RESEARCHMATCH_METRICS_PATH",
    "RESEARCHMATCH_REDIS_URL",
    "RESEARCHMATCH_CACHE_TTL_SECS",
    "RESEARCHMATCH_TOP_N",
    "RESEARCHMATCH_SORT_BY",
    "RESEARCHMATCH_EMBEDDING_DIM",
    "RESEARCHMATCH_EMBEDDING_EPOCHS",
    "RESEARCHMATCH_EMBEDDING_SEED",
    "RESEARCHMATCH_CITATION_WEIGHTS",
    "RESEARCHMATCH_ORACLE_MODEL",
    "RESEARCHMATCH_ORACLE_LISTING_LIMIT",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_env();
    // SAFETY: Test code only, serialized with #[serial].
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_env();
    result
}

fn clear_env() {
    // SAFETY: Test code only, serialized with #[serial].
    for key in VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.catalog_path, PathBuf::from("public/results.json"));
    assert_eq!(config.metrics_path, PathBuf::from("dashboard/matching_metrics.json"));
    assert_eq!(config.cache, CacheSetting::Memory);
    assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    assert_eq!(config.top_n, 10);
    assert_eq!(config.default_sort, None);
    assert_eq!(config.embedding_dim, 100);
    assert_eq!(config.embedding_epochs, 5);
    assert_eq!(config.embedding_seed, 42);
    assert_eq!(config.citation_weights, CitationWeights::default());
    assert_eq!(config.oracle_model, "deepseek-chat");
    assert_eq!(config.oracle_listing_limit, 200);
}

#[test]
fn test_derived_settings() {
    let config = Config {
        top_n: 3,
        default_sort: Some(SortMetric::HIndex),
        embedding_dim: 16,
        cache_ttl: Duration::from_secs(60),
        ..Default::default()
    };

    let options = config.match_options();
    assert_eq!(options.top_n, 3);
    assert_eq!(options.sort_by, Some(SortMetric::HIndex));
    assert!(options.descending);
    assert_eq!(config.embedding_config().dim, 16);
    assert_eq!(config.instrument_config().ttl, Duration::from_secs(60));
    assert_eq!(config.citation_sorter().weights(), &config.citation_weights);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    let config = with_env_vars(&[], || Config::from_env().expect("should parse with defaults"));
    assert_eq!(config.top_n, 10);
    assert_eq!(config.cache, CacheSetting::Memory);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("RESEARCHMATCH_CATALOG_PATH", "/data/faculty.json"),
            ("RESEARCHMATCH_REDIS_URL", "redis://cache:6380/2"),
            ("RESEARCHMATCH_CACHE_TTL_SECS", "120"),
            ("RESEARCHMATCH_TOP_N", "25"),
            ("RESEARCHMATCH_SORT_BY", "h-index"),
            ("RESEARCHMATCH_EMBEDDING_SEED", "7"),
            ("RESEARCHMATCH_CITATION_WEIGHTS", "0.5, 2, 0"),
            ("RESEARCHMATCH_ORACLE_MODEL", "gpt-4o-mini"),
        ],
        || Config::from_env().expect("valid overrides"),
    );

    assert_eq!(config.catalog_path, PathBuf::from("/data/faculty.json"));
    assert_eq!(config.cache, CacheSetting::Redis("redis://cache:6380/2".to_string()));
    assert_eq!(config.cache_ttl, Duration::from_secs(120));
    assert_eq!(config.top_n, 25);
    assert_eq!(config.default_sort, Some(SortMetric::HIndex));
    assert_eq!(config.embedding_seed, 7);
    assert_eq!(config.citation_weights, CitationWeights::new(0.5, 2.0, 0.0));
    assert_eq!(config.oracle_model, "gpt-4o-mini");
}

#[test]
#[serial]
fn test_redis_url_off_disables_cache() {
    let config = with_env_vars(&[("RESEARCHMATCH_REDIS_URL", "OFF")], || {
        Config::from_env().expect("valid")
    });
    assert_eq!(config.cache, CacheSetting::Disabled);
}

#[test]
#[serial]
fn test_invalid_number() {
    let err = with_env_vars(&[("RESEARCHMATCH_TOP_N", "many")], Config::from_env)
        .expect_err("not a number");
    assert!(matches!(
        err,
        ConfigError::InvalidNumber { name: "RESEARCHMATCH_TOP_N", .. }
    ));
}

#[test]
#[serial]
fn test_zero_top_n_rejected() {
    let err = with_env_vars(&[("RESEARCHMATCH_TOP_N", "0")], Config::from_env)
        .expect_err("zero");
    assert!(err.to_string().contains("at least 1"));
}

#[test]
#[serial]
fn test_invalid_sort_metric() {
    let err = with_env_vars(&[("RESEARCHMATCH_SORT_BY", "popularity")], Config::from_env)
        .expect_err("unknown metric");
    assert!(matches!(err, ConfigError::InvalidSortMetric { .. }));
}

#[test]
#[serial]
fn test_invalid_citation_weights() {
    for raw in ["1,2", "1,x,3", "1,inf,3"] {
        let err = with_env_vars(&[("RESEARCHMATCH_CITATION_WEIGHTS", raw)], Config::from_env)
            .expect_err(raw);
        assert!(
            matches!(
                err,
                ConfigError::InvalidNumber { name: "RESEARCHMATCH_CITATION_WEIGHTS", .. }
            ),
            "{raw}"
        );
    }
}

#[test]
fn test_validate_catalog_path() {
    let dir = TempDir::new().expect("tempdir");

    let missing = Config {
        catalog_path: dir.path().join("missing.json"),
        ..Default::default()
    };
    assert!(matches!(missing.validate(), Err(ConfigError::PathNotFound { .. })));

    let directory = Config {
        catalog_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(directory.validate(), Err(ConfigError::NotAFile { .. })));

    let file = dir.path().join("results.json");
    std::fs::write(&file, "[]").expect("write");
    let ok = Config {
        catalog_path: file,
        ..Default::default()
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_top_n() {
    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("results.json");
    std::fs::write(&file, "[]").expect("write");

    let config = Config {
        catalog_path: file,
        top_n: 0,
        ..Default::default()
    };
    match config.validate() {
        Err(ConfigError::InvalidNumber { name, value, .. }) => {
            assert_eq!(name, "RESEARCHMATCH_TOP_N");
            assert_eq!(value, "0");
        }
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
}
