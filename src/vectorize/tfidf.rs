use std::collections::{BTreeSet, HashMap, HashSet};

use super::{SparseVector, Vectorizer};
use crate::text::Preprocessor;

/// Corpus-fit TF-IDF vectorizer.
///
/// Vocabulary is the sorted set of preprocessed corpus tokens. Weights are
/// `count(term) * idf(term)` with smoothed `idf = ln((1 + n) / (1 + df)) + 1`, then L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    preprocessor: Preprocessor,
    vocabulary: HashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fits the vocabulary and IDF weights on `corpus`.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        Self::fit_with(Preprocessor::new(), corpus)
    }

    /// Fits with an explicit preprocessor.
    pub fn fit_with<S: AsRef<str>>(preprocessor: Preprocessor, corpus: &[S]) -> Self {
        let docs: Vec<HashSet<String>> = corpus
            .iter()
            .map(|doc| preprocessor.token_set(doc.as_ref()))
            .collect();

        let terms: Vec<String> = docs
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let vocabulary: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();

        let mut doc_freq = vec![0usize; terms.len()];
        for doc in &docs {
            for token in doc {
                if let Some(&i) = vocabulary.get(token) {
                    doc_freq[i as usize] += 1;
                }
            }
        }

        let n_docs = docs.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| (((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0) as f32)
            .collect();

        Self {
            preprocessor,
            vocabulary,
            terms,
            idf,
        }
    }

    /// Sorted vocabulary; position is the vector index.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// IDF weight of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&i| self.idf[i as usize])
    }

    /// Vector index of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    /// Number of terms learned by `fit`.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}

impl Vectorizer for TfidfVectorizer {
    type Vector = SparseVector;

    fn vectorize(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for token in self.preprocessor.preprocess(text) {
            if let Some(&i) = self.vocabulary.get(&token) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i as usize]))
            .collect();

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        SparseVector::new(self.terms.len(), entries)
    }

    fn dim(&self) -> usize {
        self.terms.len()
    }
}
