use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use super::types::{MatchOptions, Query};
use crate::catalog::{Catalog, Record};
use crate::citation::CitationSorter;
use crate::constants::EMBEDDING_COSINE_EPSILON;
use crate::vectorize::{
    EmbeddingConfig, EmbeddingVectorizer, TfidfVectorizer, VectorOps, Vectorizer,
    cosine_similarity,
};

/// Cosine ranking over per-record vectors precomputed with `V`.
///
/// Records whose vector is all-zero are dropped at construction and can never be returned.
#[derive(Debug, Clone)]
pub struct CosineMatcher<V: Vectorizer> {
    catalog: Arc<Catalog>,
    vectorizer: Arc<V>,
    vectors: Vec<(usize, V::Vector)>,
    epsilon: f32,
    sorter: CitationSorter,
}

/// TF-IDF cosine strategy.
pub type TfidfMatcher = CosineMatcher<TfidfVectorizer>;

/// Averaged word-embedding cosine strategy.
pub type EmbeddingMatcher = CosineMatcher<EmbeddingVectorizer>;

impl TfidfMatcher {
    /// Fits TF-IDF on the catalog's research corpus.
    pub fn fit(catalog: Arc<Catalog>, sorter: CitationSorter) -> Self {
        let vectorizer = TfidfVectorizer::fit(&catalog.research_corpus());
        Self::from_vectorizer(catalog, Arc::new(vectorizer), 0.0, sorter)
    }
}

impl EmbeddingMatcher {
    /// Trains embeddings on the catalog's research corpus.
    pub fn fit(catalog: Arc<Catalog>, config: &EmbeddingConfig, sorter: CitationSorter) -> Self {
        let vectorizer = EmbeddingVectorizer::fit(&catalog.research_corpus(), config);
        Self::from_vectorizer(catalog, Arc::new(vectorizer), EMBEDDING_COSINE_EPSILON, sorter)
    }
}

impl<V: Vectorizer> CosineMatcher<V> {
    /// Precomputes one vector per record with an already fitted vectorizer.
    pub fn from_vectorizer(
        catalog: Arc<Catalog>,
        vectorizer: Arc<V>,
        epsilon: f32,
        sorter: CitationSorter,
    ) -> Self {
        let vectors: Vec<(usize, V::Vector)> = catalog
            .iter()
            .enumerate()
            .map(|(i, record)| (i, vectorizer.vectorize(&record.research_text())))
            .filter(|(_, v)| !v.is_zero())
            .collect();

        debug!(
            records = catalog.len(),
            rankable = vectors.len(),
            dim = vectorizer.dim(),
            "Record vectors precomputed"
        );

        Self {
            catalog,
            vectorizer,
            vectors,
            epsilon,
            sorter,
        }
    }

    /// Catalog the vectors were built from.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Fitted vectorizer.
    pub fn vectorizer(&self) -> &Arc<V> {
        &self.vectorizer
    }

    /// Number of records with a non-zero vector.
    pub fn rankable(&self) -> usize {
        self.vectors.len()
    }

    /// Ranks records by cosine similarity to the query vector.
    pub fn find_matches(&self, query: &Query, options: &MatchOptions) -> Vec<Record> {
        if query.is_empty() {
            return super::finish(self.catalog.head(options.top_n), options, &self.sorter);
        }

        let query_vector = self.vectorizer.vectorize(&query.canonical());
        if query_vector.is_zero() {
            debug!(query = %query, "Query has no known terms");
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .filter_map(|(i, v)| {
                cosine_similarity(&query_vector, v, self.epsilon).map(|sim| (*i, sim))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let ranked = scored
            .into_iter()
            .take(options.top_n)
            .map(|(i, _)| self.catalog.records()[i].clone())
            .collect();

        super::finish(ranked, options, &self.sorter)
    }
}
