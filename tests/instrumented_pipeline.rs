//! Cached, metered matching against real backends and an on-disk metrics history.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{Workspace, names};
use futures::future::join_all;
use researchmatch::cache::{CacheClient, CacheStatus, MemoryBackend, MockCacheBackend};
use researchmatch::citation::{CitationSorter, SortMetric};
use researchmatch::instrument::{CachedInstrumentedMatcher, InstrumentConfig};
use researchmatch::matching::{
    EmbeddingMatcher, KeywordMatcher, MatchOptions, MockOracle, OracleMatcher, Query, Strategy,
    TfidfMatcher,
};
use researchmatch::metrics::{MetricKind, summarize};
use researchmatch::vectorize::EmbeddingConfig;

fn strategies(workspace: &Workspace) -> Vec<Strategy> {
    let catalog = workspace.catalog();
    vec![
        KeywordMatcher::new(Arc::clone(&catalog)).into(),
        TfidfMatcher::fit(Arc::clone(&catalog), CitationSorter::new()).into(),
        EmbeddingMatcher::fit(
            Arc::clone(&catalog),
            &EmbeddingConfig::default().with_dim(16),
            CitationSorter::new(),
        )
        .into(),
        OracleMatcher::new(
            catalog,
            Arc::new(MockOracle::replying("Radia Perlman, Whitfield Diffie")),
        )
        .into(),
    ]
}

#[tokio::test]
async fn test_hit_matches_miss_for_every_strategy() {
    let workspace = Workspace::new();
    let store = workspace.store();
    let query = Query::from("network security");
    let options = MatchOptions::new(3).sorted_by(SortMetric::Citations);

    for strategy in strategies(&workspace) {
        let label = strategy.label();
        let matcher = CachedInstrumentedMatcher::connect(
            strategy,
            Some(CacheClient::from(MemoryBackend::new())),
            Arc::clone(&store),
            InstrumentConfig::default(),
        )
        .await;

        let miss = matcher.find_matches(&query, &options).await;
        let hit = matcher.find_matches(&query, &options).await;

        assert_eq!(miss.status, CacheStatus::Miss, "{label}");
        assert_eq!(hit.status, CacheStatus::Hit, "{label}");
        assert_eq!(hit.records, miss.records, "{label}");
        assert_eq!(hit.quality, miss.quality, "{label}");
        assert_eq!(hit.label, format!("{label} (Cache Hit)"));
        assert!(!miss.records.is_empty(), "{label}");
    }

    let history = store.load().expect("history");
    assert_eq!(history.samples(MetricKind::Latency).len(), 8);
    assert_eq!(history.labels(MetricKind::Rouge).len(), 8);
}

#[tokio::test]
async fn test_history_document_shape() {
    let workspace = Workspace::new();
    let matcher = CachedInstrumentedMatcher::<MockCacheBackend>::new(
        KeywordMatcher::new(workspace.catalog()).into(),
        None,
        workspace.store(),
        InstrumentConfig::default(),
    );

    let outcome = matcher
        .find_matches(&Query::from("compilers"), &MatchOptions::default())
        .await;
    assert_eq!(outcome.status, CacheStatus::Disabled);
    assert_eq!(names(&outcome.records), vec!["Grace Hopper"]);

    let raw = std::fs::read_to_string(&workspace.metrics_path).expect("metrics written");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let object = doc.as_object().expect("object");
    for key in ["latency", "precision", "recall", "f1", "bleu", "rouge"] {
        let entries = object[key].as_array().expect("array");
        assert_eq!(entries.len(), 1, "{key}");
        let triple = entries[0].as_array().expect("triple");
        assert_eq!(triple.len(), 3);
        assert_eq!(triple[0], "Keyword Matcher");
        assert!(triple[1].is_i64());
        assert!(triple[2].is_f64());
    }
    assert_eq!(object["precision"][0][2], 1.0);
}

#[tokio::test]
async fn test_expired_results_are_recomputed() {
    let workspace = Workspace::new();
    let backend = MockCacheBackend::new();
    let oracle = Arc::new(MockOracle::replying("Grace Hopper"));
    let matcher = CachedInstrumentedMatcher::connect(
        OracleMatcher::new(workspace.catalog(), oracle.clone()).into(),
        Some(backend.clone()),
        workspace.store(),
        InstrumentConfig::new(Duration::from_secs(30)),
    )
    .await;
    let query = Query::from("compilers");
    let options = MatchOptions::default();

    matcher.find_matches(&query, &options).await;
    matcher.find_matches(&query, &options).await;
    assert_eq!(oracle.calls(), 1);

    backend.expire_all();
    let outcome = matcher.find_matches(&query, &options).await;
    assert_eq!(outcome.status, CacheStatus::Miss);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_calls_lose_no_samples() {
    let workspace = Workspace::new();
    let store = workspace.store();
    let matcher = Arc::new(
        CachedInstrumentedMatcher::connect(
            KeywordMatcher::new(workspace.catalog()).into(),
            Some(CacheClient::from(MemoryBackend::new())),
            Arc::clone(&store),
            InstrumentConfig::default(),
        )
        .await,
    );

    let queries = [
        "machine learning",
        "network security",
        "programming languages",
        "cryptography",
    ];
    let handles: Vec<_> = (0..24)
        .map(|i| {
            let matcher = Arc::clone(&matcher);
            let query = Query::from(queries[i % queries.len()]);
            tokio::spawn(async move {
                matcher
                    .find_matches_records(&query, &MatchOptions::default())
                    .await
            })
        })
        .collect();

    for result in join_all(handles).await {
        assert!(!result.expect("task").is_empty());
    }

    let history = store.load().expect("history");
    for kind in MetricKind::ALL {
        assert_eq!(history.samples(kind).len(), 24, "{kind}");
    }

    let summaries = summarize(&history, MetricKind::Latency);
    let total: usize = summaries.iter().map(|s| s.count).sum();
    assert_eq!(total, 24);
    assert!(summaries.iter().all(|s| s.label.starts_with("Keyword Matcher")));
}

#[tokio::test]
async fn test_unreachable_redis_falls_back_to_uncached() {
    let workspace = Workspace::new();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = researchmatch::cache::RedisBackend::new(&format!("redis://{addr}"))
        .expect("valid url")
        .with_timeout(Duration::from_millis(200));
    let matcher = CachedInstrumentedMatcher::connect(
        KeywordMatcher::new(workspace.catalog()).into(),
        Some(CacheClient::from(backend)),
        workspace.store(),
        InstrumentConfig::default(),
    )
    .await;

    assert!(!matcher.cache_enabled());
    let records = matcher
        .find_matches_records(&Query::from("cryptography"), &MatchOptions::default())
        .await;
    assert_eq!(names(&records), vec!["Alan Turing", "Whitfield Diffie"]);
}
