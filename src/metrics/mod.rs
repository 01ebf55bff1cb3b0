//! Per-call telemetry: quality scoring, the persisted history, and read-side statistics.
//!
//! The history document maps each metric kind (`latency`, `precision`, `recall`, `f1`, `bleu`,
//! `rouge`) to an unsorted list of `[label, timestamp, value]` triples. Every instrumented call
//! appends exactly one triple per kind, all with the same timestamp.

pub mod error;
pub mod quality;
pub mod rolling;
pub mod store;
pub mod types;


pub use error::{MetricsError, MetricsResult};
pub use rolling::{LabelSummary, rolling_mean, rolling_percentile, summarize};
pub use store::MetricsStore;
pub use types::{MetricKind, MetricSample, MetricsHistory, QualityMetrics, SampleSet};
