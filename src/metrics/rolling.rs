//! Trailing-window statistics over a metric series.
//!
//! Window `i` covers `values[max(0, i + 1 - window) ..= i]` (min_periods 1), so the first
//! points are computed over whatever history exists.

use std::cmp::Ordering;

use super::types::{MetricKind, MetricsHistory};

/// Per-label summary of one metric kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub p05: f64,
    pub p95: f64,
}

/// Percentile `q` (0..=1) of `sorted` with linear interpolation between closest ranks.
///
/// `sorted` must be ascending. Returns `NaN` when empty.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Percentile `q` of unsorted `values`.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    percentile_sorted(&sorted, q)
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[inline]
fn window_start(i: usize, window: usize) -> usize {
    (i + 1).saturating_sub(window.max(1))
}

/// Trailing mean at every position.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| mean(&values[window_start(i, window)..=i]))
        .collect()
}

/// Trailing percentile `q` at every position.
pub fn rolling_percentile(values: &[f64], window: usize, q: f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| percentile(&values[window_start(i, window)..=i], q))
        .collect()
}

/// Count, mean, p05 and p95 of `kind` per label, labels in first-seen order.
pub fn summarize(history: &MetricsHistory, kind: MetricKind) -> Vec<LabelSummary> {
    history
        .labels(kind)
        .into_iter()
        .map(|label| {
            let values: Vec<f64> = history
                .series(kind, &label)
                .into_iter()
                .map(|(_, v)| v)
                .collect();
            LabelSummary {
                count: values.len(),
                mean: mean(&values),
                p05: percentile(&values, 0.05),
                p95: percentile(&values, 0.95),
                label,
            }
        })
        .collect()
}
