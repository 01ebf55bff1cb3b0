//! Retrieval-quality scorers.
//!
//! All scores compare the lowercased whitespace tokens of the query against the lowercased
//! whitespace tokens of the returned records' research areas. Precision, recall and F1 work on
//! token sets; BLEU and ROUGE-L work on token sequences, with the query as reference and the
//! concatenated research text as hypothesis.

use std::collections::{HashMap, HashSet};

use super::types::QualityMetrics;
use crate::catalog::Record;

const BLEU_MAX_ORDER: usize = 4;
const BLEU_SMOOTHING_EPSILON: f64 = 0.1;
const ROUGE_EPSILON: f64 = 1e-12;

/// Scores `records` against `canonical_query`. An empty result scores all zeros.
pub fn compute(canonical_query: &str, records: &[Record]) -> QualityMetrics {
    if records.is_empty() {
        return QualityMetrics::default();
    }

    let research_text = records
        .iter()
        .flat_map(|r| r.research_areas.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let query_text = canonical_query.to_lowercase();

    let reference: Vec<&str> = query_text.split_whitespace().collect();
    let hypothesis: Vec<&str> = research_text.split_whitespace().collect();

    let (precision, recall, f1) = set_overlap(&reference, &hypothesis);

    QualityMetrics {
        precision,
        recall,
        f1,
        bleu: sentence_bleu(&reference, &hypothesis),
        rouge: rouge_l(&reference, &hypothesis),
    }
}

/// Precision, recall and F1 of the token sets.
pub fn set_overlap(query: &[&str], records: &[&str]) -> (f64, f64, f64) {
    let query: HashSet<&str> = query.iter().copied().collect();
    let records: HashSet<&str> = records.iter().copied().collect();
    let hits = query.intersection(&records).count() as f64;

    let precision = if query.is_empty() {
        0.0
    } else {
        hits / query.len() as f64
    };
    let recall = if records.is_empty() {
        0.0
    } else {
        hits / records.len() as f64
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}

fn ngram_counts<'t, 'a>(tokens: &'t [&'a str], n: usize) -> HashMap<&'t [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// Sentence BLEU with uniform weights up to 4-grams, clipped counts, brevity penalty and
/// additive smoothing (`0.1`) of zero-match orders.
///
/// Returns `0.0` for an empty hypothesis or when not a single unigram matches.
pub fn sentence_bleu(reference: &[&str], hypothesis: &[&str]) -> f64 {
    if hypothesis.is_empty() {
        return 0.0;
    }

    let mut log_sum = 0.0;
    for n in 1..=BLEU_MAX_ORDER {
        let hyp_counts = ngram_counts(hypothesis, n);
        let ref_counts = ngram_counts(reference, n);

        let clipped: usize = hyp_counts
            .iter()
            .map(|(gram, &count)| count.min(ref_counts.get(gram).copied().unwrap_or(0)))
            .sum();
        let total = hyp_counts.values().sum::<usize>().max(1);

        if n == 1 && clipped == 0 {
            return 0.0;
        }

        let numerator = if clipped == 0 {
            BLEU_SMOOTHING_EPSILON
        } else {
            clipped as f64
        };
        log_sum += (numerator / total as f64).ln() / BLEU_MAX_ORDER as f64;
    }

    brevity_penalty(reference.len(), hypothesis.len()) * log_sum.exp()
}

fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > ref_len {
        1.0
    } else if hyp_len == 0 {
        0.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}

/// Length of the longest common subsequence.
pub fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// ROUGE-L F-measure with `beta = P / R`.
pub fn rouge_l(reference: &[&str], hypothesis: &[&str]) -> f64 {
    if reference.is_empty() || hypothesis.is_empty() {
        return 0.0;
    }
    let lcs = lcs_len(reference, hypothesis) as f64;
    if lcs == 0.0 {
        return 0.0;
    }

    let recall = lcs / reference.len() as f64;
    let precision = lcs / hypothesis.len() as f64;
    let beta = precision / (recall + ROUGE_EPSILON);
    let beta_sq = beta * beta;

    (1.0 + beta_sq) * recall * precision / (recall + beta_sq * precision + ROUGE_EPSILON)
}
