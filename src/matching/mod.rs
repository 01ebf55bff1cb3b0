//! Matching strategies.
//!
//! Every strategy shares one contract: a blank query returns the first N catalog records, a
//! ranked result holds at most N distinct records, and the optional citation sort is applied
//! last, after truncation.

pub mod cosine;
pub mod error;
pub mod keyword;
pub mod oracle;
pub mod strategy;
pub mod types;


pub use cosine::{CosineMatcher, EmbeddingMatcher, TfidfMatcher};
pub use error::{MatchError, MatchResult};
pub use keyword::KeywordMatcher;
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracle;
pub use oracle::{
    DEFAULT_ORACLE_MODEL, GenaiOracle, OracleMatcher, OraclePrompt, RankingOracle, parse_reply,
};
pub use strategy::{Strategy, StrategyKind};
pub use types::{MatchOptions, Query};

use crate::catalog::Record;
use crate::citation::CitationSorter;

/// Final stage shared by all strategies: citation sort, if one was requested.
fn finish(records: Vec<Record>, options: &MatchOptions, sorter: &CitationSorter) -> Vec<Record> {
    match options.sort_by {
        Some(metric) => sorter.sort(records, metric, options.descending),
        None => records,
    }
}
