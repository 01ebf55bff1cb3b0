use std::cmp::Ordering;

use super::VectorOps;

/// Fixed-length vector stored as sorted `(index, value)` pairs; absent indices are zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    /// Builds a vector of length `dim`. Entries are sorted by index; zeros are dropped.
    ///
    /// Panics in debug builds if an index is out of range.
    pub fn new(dim: usize, mut entries: Vec<(u32, f32)>) -> Self {
        entries.retain(|&(_, v)| v != 0.0);
        entries.sort_by_key(|&(i, _)| i);
        debug_assert!(entries.iter().all(|&(i, _)| (i as usize) < dim));
        Self { dim, entries }
    }

    /// The all-zero vector of length `dim`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Dimension of the vector space.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Non-zero `(index, value)` pairs, sorted by index.
    #[inline]
    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    /// Value at `index` (zero when absent).
    pub fn get(&self, index: u32) -> f32 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Expands to a dense vector of length `dim`.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for &(i, v) in &self.entries {
            dense[i as usize] = v;
        }
        dense
    }
}

impl VectorOps for SparseVector {
    #[inline]
    fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    fn dot(&self, other: &Self) -> f32 {
        debug_assert_eq!(self.dim, other.dim, "dot product of mismatched dims");

        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (si, sv) = self.entries[i];
            let (oi, ov) = other.entries[j];
            match si.cmp(&oi) {
                Ordering::Equal => {
                    acc += sv * ov;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        acc
    }

    fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f32>().sqrt()
    }
}
