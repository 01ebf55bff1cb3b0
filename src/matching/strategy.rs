use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::cosine::{EmbeddingMatcher, TfidfMatcher};
use super::error::MatchResult;
use super::keyword::KeywordMatcher;
use super::oracle::OracleMatcher;
use super::types::{MatchOptions, Query};
use crate::catalog::{Catalog, Record};

/// Identifies a strategy without carrying its fitted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Keyword,
    Tfidf,
    Embedding,
    Oracle,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Keyword,
        StrategyKind::Tfidf,
        StrategyKind::Embedding,
        StrategyKind::Oracle,
    ];

    /// Label recorded in metrics and cache keys.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Keyword => "Keyword Matcher",
            StrategyKind::Tfidf => "TF-IDF Matcher",
            StrategyKind::Embedding => "Word2Vec Matcher",
            StrategyKind::Oracle => "LLM Matcher",
        }
    }

    /// Short CLI name.
    #[inline]
    pub fn cli_name(&self) -> &'static str {
        match self {
            StrategyKind::Keyword => "keyword",
            StrategyKind::Tfidf => "tfidf",
            StrategyKind::Embedding => "embedding",
            StrategyKind::Oracle => "oracle",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" | "keywords" => Ok(StrategyKind::Keyword),
            "tfidf" | "tf-idf" => Ok(StrategyKind::Tfidf),
            "embedding" | "word2vec" => Ok(StrategyKind::Embedding),
            "oracle" | "llm" => Ok(StrategyKind::Oracle),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// The closed set of matching strategies.
#[derive(Debug, Clone)]
pub enum Strategy {
    Keyword(KeywordMatcher),
    Tfidf(TfidfMatcher),
    Embedding(EmbeddingMatcher),
    Oracle(OracleMatcher),
}

impl Strategy {
    /// Which strategy this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Keyword(_) => StrategyKind::Keyword,
            Strategy::Tfidf(_) => StrategyKind::Tfidf,
            Strategy::Embedding(_) => StrategyKind::Embedding,
            Strategy::Oracle(_) => StrategyKind::Oracle,
        }
    }

    /// Metrics label of the strategy.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.kind().label()
    }

    /// The catalog this strategy ranks.
    pub fn catalog(&self) -> &Arc<Catalog> {
        match self {
            Strategy::Keyword(m) => m.catalog(),
            Strategy::Tfidf(m) => m.catalog(),
            Strategy::Embedding(m) => m.catalog(),
            Strategy::Oracle(m) => m.catalog(),
        }
    }

    /// Ranks catalog records against `query`.
    ///
    /// Only the oracle strategy can return an error; the local strategies always succeed.
    pub async fn find_matches(
        &self,
        query: &Query,
        options: &MatchOptions,
    ) -> MatchResult<Vec<Record>> {
        match self {
            Strategy::Keyword(m) => Ok(m.find_matches(query, options)),
            Strategy::Tfidf(m) => Ok(m.find_matches(query, options)),
            Strategy::Embedding(m) => Ok(m.find_matches(query, options)),
            Strategy::Oracle(m) => m.find_matches(query, options).await,
        }
    }
}

impl From<KeywordMatcher> for Strategy {
    fn from(m: KeywordMatcher) -> Self {
        Strategy::Keyword(m)
    }
}

impl From<TfidfMatcher> for Strategy {
    fn from(m: TfidfMatcher) -> Self {
        Strategy::Tfidf(m)
    }
}

impl From<EmbeddingMatcher> for Strategy {
    fn from(m: EmbeddingMatcher) -> Self {
        Strategy::Embedding(m)
    }
}

impl From<OracleMatcher> for Strategy {
    fn from(m: OracleMatcher) -> Self {
        Strategy::Oracle(m)
    }
}
