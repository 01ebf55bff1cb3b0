use std::fmt;

use super::error::{MatchError, MatchResult};
use crate::citation::SortMetric;
use crate::constants::NUM_MATCHES;

/// A free-text query, either raw text or pre-split terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Text(String),
    Terms(Vec<String>),
}

impl Query {
    /// Trimmed text form. Terms are joined with single spaces.
    ///
    /// Cache fingerprints and quality metrics are computed from this string.
    pub fn canonical(&self) -> String {
        match self {
            Query::Text(text) => text.trim().to_string(),
            Query::Terms(terms) => terms.join(" ").trim().to_string(),
        }
    }

    /// `true` when the canonical form is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Query::Text(text) => text.trim().is_empty(),
            Query::Terms(terms) => terms.iter().all(|t| t.trim().is_empty()),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::Text(String::new())
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Text(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Text(text)
    }
}

impl From<Vec<String>> for Query {
    fn from(terms: Vec<String>) -> Self {
        Query::Terms(terms)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Per-call matching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchOptions {
    /// Maximum number of records returned. Default: `10`.
    pub top_n: usize,
    /// Citation re-ordering applied after truncation. Default: none.
    pub sort_by: Option<SortMetric>,
    /// Direction of the citation re-ordering. Default: `true`.
    pub descending: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            top_n: NUM_MATCHES,
            sort_by: None,
            descending: true,
        }
    }
}

impl MatchOptions {
    /// Options returning `top_n` records, unsorted, descending.
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }

    /// Replaces the result count.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sorts results by `metric` after ranking.
    pub fn sorted_by(mut self, metric: SortMetric) -> Self {
        self.sort_by = Some(metric);
        self
    }

    /// Sorts in ascending order.
    pub fn ascending(mut self) -> Self {
        self.descending = false;
        self
    }

    /// Rejects a zero result count.
    ///
    /// Strategies themselves accept `top_n == 0` and return nothing; callers that build options
    /// from user input use this to report the mistake instead.
    pub fn validate(&self) -> MatchResult<()> {
        if self.top_n == 0 {
            return Err(MatchError::InvalidOptions {
                reason: "top_n must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
