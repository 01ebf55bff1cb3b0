//! Citation-based ordering of ranked records.
//!
//! Runs as the last stage of every strategy, after truncation, and only when a metric was
//! requested. Sorting is stable in both directions, so equal scores keep their incoming order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Record, Statistics};

/// Statistic a ranked result can be re-ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMetric {
    Citations,
    HIndex,
    I10Index,
    /// Weighted sum of all three, see [`CitationWeights`].
    Custom,
}

impl SortMetric {
    pub const ALL: [SortMetric; 4] = [
        SortMetric::Citations,
        SortMetric::HIndex,
        SortMetric::I10Index,
        SortMetric::Custom,
    ];

    /// Stable name, used in cache fingerprints and CLI output.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            SortMetric::Citations => "CITATIONS",
            SortMetric::HIndex => "H_INDEX",
            SortMetric::I10Index => "I10_INDEX",
            SortMetric::Custom => "CUSTOM",
        }
    }

    /// JSON field name of the statistic (`None` for the composite).
    #[inline]
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            SortMetric::Citations => Some("citations"),
            SortMetric::HIndex => Some("h-index"),
            SortMetric::I10Index => Some("i10-index"),
            SortMetric::Custom => None,
        }
    }
}

impl fmt::Display for SortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized sort metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort metric: {0}")]
pub struct ParseSortMetricError(pub String);

impl FromStr for SortMetric {
    type Err = ParseSortMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortMetric::ALL
            .into_iter()
            .find(|m| {
                m.name().eq_ignore_ascii_case(wanted)
                    || m.field_name().is_some_and(|f| f.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| ParseSortMetricError(s.to_string()))
    }
}

/// Weights of the [`SortMetric::Custom`] composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitationWeights {
    pub citations: f64,
    pub h_index: f64,
    pub i10_index: f64,
}

impl Default for CitationWeights {
    fn default() -> Self {
        Self {
            citations: 1.0,
            h_index: 1.0,
            i10_index: 1.0,
        }
    }
}

impl CitationWeights {
    /// Weights for citations, h-index and i10-index.
    pub fn new(citations: f64, h_index: f64, i10_index: f64) -> Self {
        Self {
            citations,
            h_index,
            i10_index,
        }
    }

    /// Weighted sum of `stats`.
    #[inline]
    pub fn score(&self, stats: &Statistics) -> f64 {
        self.citations * stats.citations
            + self.h_index * stats.h_index
            + self.i10_index * stats.i10_index
    }
}

/// Re-orders records by a citation statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CitationSorter {
    weights: CitationWeights,
}

impl CitationSorter {
    /// Sorter with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorter using `weights` for the weighted metric.
    pub fn with_weights(weights: CitationWeights) -> Self {
        Self { weights }
    }

    /// Weights applied by the weighted metric.
    #[inline]
    pub fn weights(&self) -> &CitationWeights {
        &self.weights
    }

    /// Score of `record` under `metric`.
    pub fn score(&self, record: &Record, metric: SortMetric) -> f64 {
        let stats = &record.statistics;
        match metric {
            SortMetric::Citations => stats.citations,
            SortMetric::HIndex => stats.h_index,
            SortMetric::I10Index => stats.i10_index,
            SortMetric::Custom => self.weights.score(stats),
        }
    }

    /// Returns `records` ordered by `metric`. Stable; NaN compares equal to everything.
    pub fn sort(&self, records: Vec<Record>, metric: SortMetric, descending: bool) -> Vec<Record> {
        let mut keyed: Vec<(f64, Record)> = records
            .into_iter()
            .map(|r| (self.score(&r, metric), r))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        });

        keyed.into_iter().map(|(_, r)| r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, citations: f64, h: f64, i10: f64) -> Record {
        Record::new(name, vec![], Statistics::new(citations, h, i10))
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_sort_metric_names() {
        assert_eq!(SortMetric::Citations.name(), "CITATIONS");
        assert_eq!(SortMetric::HIndex.name(), "H_INDEX");
        assert_eq!(SortMetric::I10Index.name(), "I10_INDEX");
        assert_eq!(SortMetric::Custom.name(), "CUSTOM");
        assert_eq!(SortMetric::HIndex.to_string(), "H_INDEX");
    }

    #[test]
    fn test_sort_metric_from_str() {
        assert_eq!("citations".parse::<SortMetric>(), Ok(SortMetric::Citations));
        assert_eq!("H_INDEX".parse::<SortMetric>(), Ok(SortMetric::HIndex));
        assert_eq!("h-index".parse::<SortMetric>(), Ok(SortMetric::HIndex));
        assert_eq!("I10-Index".parse::<SortMetric>(), Ok(SortMetric::I10Index));
        assert_eq!(" custom ".parse::<SortMetric>(), Ok(SortMetric::Custom));
        assert!("impact".parse::<SortMetric>().is_err());
    }

    #[test]
    fn test_sort_descending_by_citations() {
        let sorter = CitationSorter::new();
        let sorted = sorter.sort(
            vec![record("a", 10.0, 1.0, 1.0), record("b", 30.0, 1.0, 1.0), record("c", 20.0, 1.0, 1.0)],
            SortMetric::Citations,
            true,
        );
        assert_eq!(names(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_ascending_by_h_index() {
        let sorter = CitationSorter::new();
        let sorted = sorter.sort(
            vec![record("a", 0.0, 9.0, 0.0), record("b", 0.0, 3.0, 0.0), record("c", 0.0, 5.0, 0.0)],
            SortMetric::HIndex,
            false,
        );
        assert_eq!(names(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let sorter = CitationSorter::new();
        let input = vec![
            record("a", 5.0, 0.0, 0.0),
            record("b", 5.0, 0.0, 0.0),
            record("c", 9.0, 0.0, 0.0),
            record("d", 5.0, 0.0, 0.0),
        ];
        let desc = sorter.sort(input.clone(), SortMetric::Citations, true);
        assert_eq!(names(&desc), vec!["c", "a", "b", "d"]);
        let asc = sorter.sort(input, SortMetric::Citations, false);
        assert_eq!(names(&asc), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_custom_uses_weights() {
        let sorter = CitationSorter::with_weights(CitationWeights::new(0.0, 10.0, 1.0));
        let sorted = sorter.sort(
            vec![record("a", 1000.0, 1.0, 1.0), record("b", 0.0, 5.0, 0.0)],
            SortMetric::Custom,
            true,
        );
        assert_eq!(names(&sorted), vec!["b", "a"]);
        assert_eq!(sorter.score(&sorted[1], SortMetric::Custom), 11.0);
    }

    #[test]
    fn test_custom_default_weights_sum() {
        let sorter = CitationSorter::new();
        assert_eq!(sorter.score(&record("a", 100.0, 10.0, 5.0), SortMetric::Custom), 115.0);
    }

    #[test]
    fn test_nan_does_not_panic() {
        let sorter = CitationSorter::new();
        let sorted = sorter.sort(
            vec![record("a", f64::NAN, 0.0, 0.0), record("b", 1.0, 0.0, 0.0)],
            SortMetric::Citations,
            true,
        );
        assert_eq!(sorted.len(), 2);
    }

    #[test]
    fn test_sort_empty() {
        let sorter = CitationSorter::new();
        assert!(sorter.sort(vec![], SortMetric::Citations, true).is_empty());
    }
}
