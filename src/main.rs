//! researchmatch command-line entrypoint.
//!
//! ```text
//! researchmatch [--strategy NAME] [--top N] [--sort METRIC] [--ascending] QUERY...
//! researchmatch --summary
//! ```

use std::sync::Arc;

use anyhow::{Context, bail};
use mimalloc::MiMalloc;

use researchmatch::cache::{CacheClient, MemoryBackend, RedisBackend};
use researchmatch::catalog::Catalog;
use researchmatch::citation::SortMetric;
use researchmatch::config::{CacheSetting, Config};
use researchmatch::constants::ROLLING_WINDOW;
use researchmatch::instrument::CachedInstrumentedMatcher;
use researchmatch::matching::{
    EmbeddingMatcher, GenaiOracle, KeywordMatcher, OracleMatcher, Query, Strategy, StrategyKind,
    TfidfMatcher,
};
use researchmatch::metrics::{MetricKind, MetricsStore, rolling_mean, summarize};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: researchmatch [--strategy keyword|tfidf|embedding|oracle] \
                     [--top N] [--sort METRIC] [--ascending] QUERY...\n       \
                     researchmatch --summary";

#[derive(Debug)]
struct Args {
    strategy: StrategyKind,
    top_n: Option<usize>,
    sort_by: Option<SortMetric>,
    ascending: bool,
    summary: bool,
    query: Vec<String>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = Self {
            strategy: StrategyKind::Keyword,
            top_n: None,
            sort_by: None,
            ascending: false,
            summary: false,
            query: Vec::new(),
        };

        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--strategy" | "-s" => {
                    let value = raw.next().context("--strategy needs a value")?;
                    args.strategy = value.parse().map_err(anyhow::Error::msg)?;
                }
                "--top" | "-n" => {
                    let value = raw.next().context("--top needs a value")?;
                    let top_n: usize = value
                        .parse()
                        .with_context(|| format!("invalid --top value '{value}'"))?;
                    args.top_n = Some(top_n);
                }
                "--sort" => {
                    let value = raw.next().context("--sort needs a value")?;
                    args.sort_by = Some(value.parse()?);
                }
                "--ascending" => args.ascending = true,
                "--summary" => args.summary = true,
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => bail!("unknown flag '{flag}'\n{USAGE}"),
                _ => args.query.push(arg),
            }
        }
        Ok(args)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = Config::from_env()?;

    if args.summary {
        return print_summary(&config);
    }

    config.validate()?;

    let catalog = Arc::new(Catalog::load(&config.catalog_path)?);
    tracing::info!(
        records = catalog.len(),
        strategy = %args.strategy,
        "researchmatch starting"
    );

    let strategy = build_strategy(args.strategy, Arc::clone(&catalog), &config);
    let cache = build_cache(&config)?;
    let store = Arc::new(MetricsStore::open(&config.metrics_path));

    let matcher =
        CachedInstrumentedMatcher::connect(strategy, cache, store, config.instrument_config())
            .await;

    let mut options = config.match_options();
    if let Some(top_n) = args.top_n {
        options.top_n = top_n;
    }
    if args.sort_by.is_some() {
        options.sort_by = args.sort_by;
    }
    options.descending = !args.ascending;
    options.validate().context("invalid --top")?;

    let outcome = matcher
        .find_matches(&Query::from(args.query), &options)
        .await;

    tracing::info!(
        status = %outcome.status,
        matches = outcome.len(),
        latency_ms = outcome.latency.as_secs_f64() * 1000.0,
        f1 = outcome.quality.f1,
        "Query complete"
    );

    println!("{}", serde_json::to_string_pretty(&outcome.records)?);
    Ok(())
}

fn build_strategy(kind: StrategyKind, catalog: Arc<Catalog>, config: &Config) -> Strategy {
    let sorter = config.citation_sorter();
    match kind {
        StrategyKind::Keyword => KeywordMatcher::with_sorter(catalog, sorter).into(),
        StrategyKind::Tfidf => TfidfMatcher::fit(catalog, sorter).into(),
        StrategyKind::Embedding => {
            EmbeddingMatcher::fit(catalog, &config.embedding_config(), sorter).into()
        }
        StrategyKind::Oracle => {
            let oracle = Arc::new(GenaiOracle::new(config.oracle_model.clone()));
            OracleMatcher::new(catalog, oracle)
                .with_listing_limit(config.oracle_listing_limit)
                .with_sorter(sorter)
                .into()
        }
    }
}

fn build_cache(config: &Config) -> anyhow::Result<Option<CacheClient>> {
    Ok(match &config.cache {
        CacheSetting::Memory => Some(MemoryBackend::new().into()),
        CacheSetting::Redis(url) => Some(RedisBackend::new(url)?.into()),
        CacheSetting::Disabled => {
            tracing::info!("Result cache disabled");
            None
        }
    })
}

fn print_summary(config: &Config) -> anyhow::Result<()> {
    let store = MetricsStore::open(&config.metrics_path);
    let history = store.load()?;
    if history.is_empty() {
        println!("no metrics recorded in {}", store.path().display());
        return Ok(());
    }

    for kind in MetricKind::ALL {
        println!("{kind}");
        for summary in summarize(&history, kind) {
            let values: Vec<f64> = history
                .series(kind, &summary.label)
                .into_iter()
                .map(|(_, v)| v)
                .collect();
            let trailing = rolling_mean(&values, ROLLING_WINDOW)
                .last()
                .copied()
                .unwrap_or(f64::NAN);
            println!(
                "  {:<32} n={:<6} mean={:.4} p05={:.4} p95={:.4} rolling={:.4}",
                summary.label, summary.count, summary.mean, summary.p05, summary.p95, trailing
            );
        }
    }
    Ok(())
}
