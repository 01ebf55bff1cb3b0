//! Text vectorizers fit on the catalog corpus.
//!
//! - [`TfidfVectorizer`]: sparse TF-IDF over the preprocessed vocabulary.
//! - [`EmbeddingVectorizer`]: word2vec trained per process; a text maps to the mean of its
//!   in-vocabulary token vectors.
//!
//! Both produce fixed-length vectors. An all-zero vector means "no signal" and must never be
//! ranked; [`cosine_similarity`] returns `None` for it.

pub mod embedding;
pub mod sparse;
pub mod tfidf;

#[cfg(test)]
mod tests;

pub use embedding::{EmbeddingConfig, EmbeddingVectorizer, TrainingMode};
pub use sparse::SparseVector;
pub use tfidf::TfidfVectorizer;

/// Minimal vector algebra needed for cosine ranking.
pub trait VectorOps {
    /// `true` when every component is zero.
    fn is_zero(&self) -> bool;
    fn dot(&self, other: &Self) -> f32;
    fn norm(&self) -> f32;
}

impl VectorOps for Vec<f32> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.iter().all(|&v| v == 0.0)
    }

    #[inline]
    fn dot(&self, other: &Self) -> f32 {
        debug_assert_eq!(self.len(), other.len(), "dot product of mismatched dims");
        self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

/// A vectorizer fit once on a corpus, then used read-only.
pub trait Vectorizer: Send + Sync {
    type Vector: VectorOps + Clone + Send + Sync;

    /// Maps `text` into the fitted space.
    fn vectorize(&self, text: &str) -> Self::Vector;

    /// Dimensionality of every vector this vectorizer produces.
    fn dim(&self) -> usize;
}

/// Cosine similarity with `epsilon` added to the denominator.
///
/// Returns `None` if either side is the zero vector.
pub fn cosine_similarity<V: VectorOps>(a: &V, b: &V, epsilon: f32) -> Option<f32> {
    if a.is_zero() || b.is_zero() {
        return None;
    }
    Some(a.dot(b) / (a.norm() * b.norm() + epsilon))
}
