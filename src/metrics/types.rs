use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six recorded measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Latency,
    Precision,
    Recall,
    F1,
    Bleu,
    Rouge,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Latency,
        MetricKind::Precision,
        MetricKind::Recall,
        MetricKind::F1,
        MetricKind::Bleu,
        MetricKind::Rouge,
    ];

    /// Key of this kind in the persisted document.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Latency => "latency",
            MetricKind::Precision => "precision",
            MetricKind::Recall => "recall",
            MetricKind::F1 => "f1",
            MetricKind::Bleu => "bleu",
            MetricKind::Rouge => "rouge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MetricKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown metric kind: {s}"))
    }
}

/// Retrieval-quality scores of one ranked result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub bleu: f64,
    pub rouge: f64,
}

/// Everything recorded for one completed call: one value per [`MetricKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    /// Base strategy label, or the cache-hit label.
    pub label: String,
    /// Unix seconds at the start of the call; shared by all six samples.
    pub timestamp: i64,
    /// Wall time in seconds.
    pub latency: f64,
    pub quality: QualityMetrics,
}

impl SampleSet {
    /// Sample set sharing one label and timestamp.
    pub fn new(label: impl Into<String>, timestamp: i64, latency: f64, quality: QualityMetrics) -> Self {
        Self {
            label: label.into(),
            timestamp,
            latency,
            quality,
        }
    }

    /// Value recorded for `kind`.
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Latency => self.latency,
            MetricKind::Precision => self.quality.precision,
            MetricKind::Recall => self.quality.recall,
            MetricKind::F1 => self.quality.f1,
            MetricKind::Bleu => self.quality.bleu,
            MetricKind::Rouge => self.quality.rouge,
        }
    }
}

/// A single `[label, timestamp, value]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, i64, f64)", into = "(String, i64, f64)")]
pub struct MetricSample {
    pub label: String,
    pub timestamp: i64,
    pub value: f64,
}

impl From<(String, i64, f64)> for MetricSample {
    fn from((label, timestamp, value): (String, i64, f64)) -> Self {
        Self {
            label,
            timestamp,
            value,
        }
    }
}

impl From<MetricSample> for (String, i64, f64) {
    fn from(s: MetricSample) -> Self {
        (s.label, s.timestamp, s.value)
    }
}

/// The full persisted history: one unsorted sample list per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsHistory {
    pub latency: Vec<MetricSample>,
    pub precision: Vec<MetricSample>,
    pub recall: Vec<MetricSample>,
    pub f1: Vec<MetricSample>,
    pub bleu: Vec<MetricSample>,
    pub rouge: Vec<MetricSample>,
}

impl MetricsHistory {
    /// Samples of one kind, in append order.
    pub fn samples(&self, kind: MetricKind) -> &[MetricSample] {
        match kind {
            MetricKind::Latency => &self.latency,
            MetricKind::Precision => &self.precision,
            MetricKind::Recall => &self.recall,
            MetricKind::F1 => &self.f1,
            MetricKind::Bleu => &self.bleu,
            MetricKind::Rouge => &self.rouge,
        }
    }

    fn samples_mut(&mut self, kind: MetricKind) -> &mut Vec<MetricSample> {
        match kind {
            MetricKind::Latency => &mut self.latency,
            MetricKind::Precision => &mut self.precision,
            MetricKind::Recall => &mut self.recall,
            MetricKind::F1 => &mut self.f1,
            MetricKind::Bleu => &mut self.bleu,
            MetricKind::Rouge => &mut self.rouge,
        }
    }

    /// Appends exactly one sample per kind, all sharing `set.timestamp`.
    pub fn push(&mut self, set: &SampleSet) {
        for kind in MetricKind::ALL {
            self.samples_mut(kind).push(MetricSample {
                label: set.label.clone(),
                timestamp: set.timestamp,
                value: set.value(kind),
            });
        }
    }

    /// `(timestamp, value)` pairs of `label` for `kind`, time-sorted (stable).
    pub fn series(&self, kind: MetricKind, label: &str) -> Vec<(i64, f64)> {
        let mut series: Vec<(i64, f64)> = self
            .samples(kind)
            .iter()
            .filter(|s| s.label == label)
            .map(|s| (s.timestamp, s.value))
            .collect();
        series.sort_by_key(|&(ts, _)| ts);
        series
    }

    /// Distinct labels recorded for `kind`, in first-seen order.
    pub fn labels(&self, kind: MetricKind) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for sample in self.samples(kind) {
            if !labels.contains(&sample.label) {
                labels.push(sample.label.clone());
            }
        }
        labels
    }

    /// Number of recorded calls (latency samples).
    pub fn len(&self) -> usize {
        self.latency.len()
    }

    /// True when no samples of any kind exist.
    pub fn is_empty(&self) -> bool {
        MetricKind::ALL.iter().all(|&k| self.samples(k).is_empty())
    }
}
