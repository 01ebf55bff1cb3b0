use std::collections::HashSet;
use std::sync::Arc;

use super::types::{MatchOptions, Query};
use crate::catalog::{Catalog, Record};
use crate::citation::CitationSorter;
use crate::text::Preprocessor;

/// Lexical overlap between the query token set and each record's keyword set.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    catalog: Arc<Catalog>,
    preprocessor: Preprocessor,
    keywords: Vec<HashSet<String>>,
    sorter: CitationSorter,
}

impl KeywordMatcher {
    /// Matcher over `catalog` with the default citation sorter.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_sorter(catalog, CitationSorter::new())
    }

    /// Matcher over `catalog` with a custom citation sorter.
    pub fn with_sorter(catalog: Arc<Catalog>, sorter: CitationSorter) -> Self {
        let preprocessor = Preprocessor::new();
        let keywords = catalog
            .iter()
            .map(|record| preprocessor.token_set(&record.research_text()))
            .collect();
        Self {
            catalog,
            preprocessor,
            keywords,
            sorter,
        }
    }

    /// Catalog being searched.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Keyword set precomputed for the record at `index`.
    pub fn keywords(&self, index: usize) -> Option<&HashSet<String>> {
        self.keywords.get(index)
    }

    /// Ranks records by the number of query terms they share.
    pub fn find_matches(&self, query: &Query, options: &MatchOptions) -> Vec<Record> {
        if query.is_empty() {
            return super::finish(self.catalog.head(options.top_n), options, &self.sorter);
        }

        let query_tokens = self.preprocessor.token_set(&query.canonical());
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .keywords
            .iter()
            .enumerate()
            .filter_map(|(i, kw)| {
                let overlap = kw.intersection(&query_tokens).count();
                (overlap > 0).then_some((i, overlap))
            })
            .collect();

        // Stable: equal overlap keeps catalog order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let ranked = scored
            .into_iter()
            .take(options.top_n)
            .map(|(i, _)| self.catalog.records()[i].clone())
            .collect();

        super::finish(ranked, options, &self.sorter)
    }
}
