//! Word2vec (negative sampling) trained on the catalog corpus.
//!
//! The model is trained once per process and never persisted. Training is single-threaded and
//! seeded, so the same corpus and config always yield the same vectors.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::Vectorizer;
use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::text::Preprocessor;

const MAX_EXP: f32 = 6.0;
const UNIGRAM_POWER: f64 = 0.75;

/// Word2vec architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingMode {
    /// Predict the center word from the mean of its context.
    #[default]
    Cbow,
    /// Predict the center word from each context word independently.
    SkipGram,
}

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Embedding dimensionality. Default: `100`.
    pub dim: usize,
    /// Max distance between center and context word. Default: `5`.
    pub window: usize,
    /// Words seen fewer times are ignored. Default: `1`.
    pub min_count: usize,
    /// Negative samples per positive example. Default: `5`.
    pub negative: usize,
    /// Passes over the corpus. Default: `5`.
    pub epochs: usize,
    /// Initial learning rate. Default: `0.025`.
    pub learning_rate: f32,
    /// Floor of the linearly decaying learning rate. Default: `0.0001`.
    pub min_learning_rate: f32,
    /// RNG seed. Default: `42`.
    pub seed: u64,
    pub mode: TrainingMode,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
            window: 5,
            min_count: 1,
            negative: 5,
            epochs: 5,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            seed: 42,
            mode: TrainingMode::Cbow,
        }
    }
}

impl EmbeddingConfig {
    /// Sets the vector dimension.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Sets the number of training epochs.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects CBOW or skip-gram training.
    pub fn with_mode(mut self, mode: TrainingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Averaged word-embedding vectorizer.
#[derive(Debug, Clone)]
pub struct EmbeddingVectorizer {
    preprocessor: Preprocessor,
    vocab: HashMap<String, usize>,
    /// Row-major `vocab_size x dim` input embeddings.
    vectors: Vec<f32>,
    dim: usize,
}

impl EmbeddingVectorizer {
    /// Trains embeddings on `corpus` with `config`.
    pub fn fit<S: AsRef<str>>(corpus: &[S], config: &EmbeddingConfig) -> Self {
        let preprocessor = Preprocessor::new();
        let dim = config.dim.max(1);

        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| preprocessor.preprocess(doc.as_ref()))
            .collect();

        let (words, counts) = build_vocab(&tokenized, config.min_count.max(1));
        let vocab: HashMap<String, usize> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();

        let sentences: Vec<Vec<usize>> = tokenized
            .iter()
            .map(|tokens| tokens.iter().filter_map(|t| vocab.get(t).copied()).collect())
            .collect();

        let mut trainer = Trainer::new(words.len(), dim, &counts, config);
        trainer.train(&sentences);

        debug!(
            vocab_size = words.len(),
            dim,
            mode = ?config.mode,
            "Embedding model trained"
        );

        Self {
            preprocessor,
            vocab,
            vectors: trainer.syn0,
            dim,
        }
    }

    /// Learned vector of `word`, if in vocabulary.
    pub fn word_vector(&self, word: &str) -> Option<&[f32]> {
        self.vocab
            .get(word)
            .map(|&i| &self.vectors[i * self.dim..(i + 1) * self.dim])
    }

    /// True when `word` has a trained vector.
    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains_key(word)
    }

    /// Number of words with a trained vector.
    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }
}

impl Vectorizer for EmbeddingVectorizer {
    type Vector = Vec<f32>;

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dim];
        let mut found = 0usize;

        for token in self.preprocessor.preprocess(text) {
            if let Some(v) = self.word_vector(&token) {
                for (acc, x) in sum.iter_mut().zip(v) {
                    *acc += x;
                }
                found += 1;
            }
        }

        if found > 0 {
            let inv = 1.0 / found as f32;
            for x in &mut sum {
                *x *= inv;
            }
        }
        sum
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Words with `count >= min_count`, ordered by descending count then lexicographically.
fn build_vocab(tokenized: &[Vec<String>], min_count: usize) -> (Vec<String>, Vec<u64>) {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for token in tokenized.iter().flatten() {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<(&str, u64)> = counts
        .into_iter()
        .filter(|&(_, c)| c as usize >= min_count)
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .unzip()
}

struct Trainer {
    dim: usize,
    window: usize,
    negative: usize,
    epochs: usize,
    learning_rate: f32,
    min_learning_rate: f32,
    mode: TrainingMode,
    syn0: Vec<f32>,
    syn1neg: Vec<f32>,
    /// Cumulative unigram^0.75 distribution for negative sampling.
    noise_cdf: Vec<f64>,
    rng: StdRng,
}

impl Trainer {
    fn new(vocab_size: usize, dim: usize, counts: &[u64], config: &EmbeddingConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let syn0 = (0..vocab_size * dim)
            .map(|_| (rng.random::<f32>() - 0.5) / dim as f32)
            .collect();

        let mut acc = 0.0;
        let noise_cdf = counts
            .iter()
            .map(|&c| {
                acc += (c as f64).powf(UNIGRAM_POWER);
                acc
            })
            .collect();

        Self {
            dim,
            window: config.window.max(1),
            negative: config.negative,
            epochs: config.epochs,
            learning_rate: config.learning_rate,
            min_learning_rate: config.min_learning_rate,
            mode: config.mode,
            syn0,
            syn1neg: vec![0.0; vocab_size * dim],
            noise_cdf,
            rng,
        }
    }

    fn train(&mut self, sentences: &[Vec<usize>]) {
        let words_per_epoch: usize = sentences.iter().map(Vec::len).sum();
        let total = (words_per_epoch * self.epochs) as f32;
        if total == 0.0 {
            return;
        }

        let mut processed = 0usize;
        let mut neu1 = vec![0.0f32; self.dim];
        let mut neu1e = vec![0.0f32; self.dim];

        for _ in 0..self.epochs {
            for sentence in sentences {
                for pos in 0..sentence.len() {
                    let progress = processed as f32 / total;
                    let alpha = (self.learning_rate * (1.0 - progress)).max(self.min_learning_rate);
                    processed += 1;

                    let reduced = self.rng.random_range(0..self.window);
                    let span = self.window - reduced;
                    let start = pos.saturating_sub(span);
                    let end = (pos + span + 1).min(sentence.len());
                    let center = sentence[pos];

                    match self.mode {
                        TrainingMode::SkipGram => {
                            for (c, &context) in sentence.iter().enumerate().take(end).skip(start) {
                                if c == pos {
                                    continue;
                                }
                                neu1.copy_from_slice(self.row(context));
                                neu1e.fill(0.0);
                                self.negative_sampling(center, &neu1, &mut neu1e, alpha);
                                add_into(self.row_mut(context), &neu1e);
                            }
                        }
                        TrainingMode::Cbow => {
                            neu1.fill(0.0);
                            let mut n_ctx = 0usize;
                            for (c, &context) in sentence.iter().enumerate().take(end).skip(start) {
                                if c == pos {
                                    continue;
                                }
                                add_into(&mut neu1, self.row(context));
                                n_ctx += 1;
                            }
                            if n_ctx == 0 {
                                continue;
                            }
                            let inv = 1.0 / n_ctx as f32;
                            neu1.iter_mut().for_each(|x| *x *= inv);

                            neu1e.fill(0.0);
                            self.negative_sampling(center, &neu1, &mut neu1e, alpha);
                            for (c, &context) in sentence.iter().enumerate().take(end).skip(start) {
                                if c != pos {
                                    add_into(self.row_mut(context), &neu1e);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// One positive and `negative` noise updates of the output layer; accumulates the input
    /// gradient into `neu1e`.
    fn negative_sampling(&mut self, target: usize, hidden: &[f32], neu1e: &mut [f32], alpha: f32) {
        for d in 0..=self.negative {
            let (word, label) = if d == 0 {
                (target, 1.0)
            } else {
                let sampled = self.sample_noise();
                if sampled == target {
                    continue;
                }
                (sampled, 0.0)
            };

            let out = &mut self.syn1neg[word * self.dim..(word + 1) * self.dim];
            let f: f32 = hidden.iter().zip(out.iter()).map(|(h, o)| h * o).sum();
            let g = (label - sigmoid(f)) * alpha;

            for ((e, o), h) in neu1e.iter_mut().zip(out.iter_mut()).zip(hidden) {
                *e += g * *o;
                *o += g * h;
            }
        }
    }

    fn sample_noise(&mut self) -> usize {
        let total = self.noise_cdf.last().copied().unwrap_or(0.0);
        let r = self.rng.random::<f64>() * total;
        self.noise_cdf
            .partition_point(|&c| c <= r)
            .min(self.noise_cdf.len().saturating_sub(1))
    }

    #[inline]
    fn row(&self, i: usize) -> &[f32] {
        &self.syn0[i * self.dim..(i + 1) * self.dim]
    }

    #[inline]
    fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.syn0[i * self.dim..(i + 1) * self.dim]
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    if x > MAX_EXP {
        1.0
    } else if x < -MAX_EXP {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[inline]
fn add_into(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}
