//! Cache-key fingerprints.
//!
//! Every field is fed to BLAKE3 with a little-endian `u64` length prefix, so distinct field
//! tuples never produce the same byte stream (`("ab", "c")` vs `("a", "bc")`).

use blake3::Hasher;

use crate::citation::SortMetric;
use crate::constants::{CACHE_KEY_PREFIX, NO_SORT_METRIC};
use crate::matching::MatchOptions;

/// The inputs that determine a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintInput<'a> {
    pub label: &'a str,
    pub canonical_query: &'a str,
    pub top_n: usize,
    pub sort_by: Option<SortMetric>,
    pub descending: bool,
}

impl<'a> FingerprintInput<'a> {
    /// Collects the fields of `options` that affect the ranking.
    pub fn new(label: &'a str, canonical_query: &'a str, options: &MatchOptions) -> Self {
        Self {
            label,
            canonical_query,
            top_n: options.top_n,
            sort_by: options.sort_by,
            descending: options.descending,
        }
    }
}

#[inline]
fn update_field(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Full 256-bit fingerprint of `input`.
pub fn fingerprint(input: &FingerprintInput<'_>) -> [u8; 32] {
    let sort_name = input.sort_by.map_or(NO_SORT_METRIC, |m| m.name());
    let direction: &[u8] = if input.descending { b"desc" } else { b"asc" };

    let mut hasher = Hasher::new();
    update_field(&mut hasher, input.label.as_bytes());
    update_field(&mut hasher, input.canonical_query.as_bytes());
    update_field(&mut hasher, &(input.top_n as u64).to_le_bytes());
    update_field(&mut hasher, sort_name.as_bytes());
    update_field(&mut hasher, direction);
    *hasher.finalize().as_bytes()
}

/// Cache key: `matcher_cache:<label>:<hex fingerprint>`.
pub fn cache_key(input: &FingerprintInput<'_>) -> String {
    let digest = blake3::Hash::from(fingerprint(input));
    format!("{CACHE_KEY_PREFIX}:{}:{}", input.label, digest.to_hex())
}
