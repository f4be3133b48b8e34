#![forbid(unsafe_code)]

use std::fmt;

use markov_core::{ChainError, TokenId};

/// Raw adjacency counts: `[i][j]` = how often token `j` directly followed `i`.
///
/// Row-major, `size × size`. Turn into probabilities with
/// [`TransitionCounts::normalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionCounts {
    size: usize,
    cells: Vec<u32>,
}

impl TransitionCounts {
    /// All-zero counts for `size` tokens.
    pub fn zeros(size: usize) -> Self {
        Self { size, cells: vec![0; size * size] }
    }

    /// Count every adjacent pair of `ids` over a vocabulary of `size` tokens.
    ///
    /// Fewer than two ids leave the matrix at zero. Any id `>= size` is an
    /// error, even when it has no neighbour.
    pub fn count(ids: &[TokenId], size: usize) -> Result<Self, ChainError> {
        if let Some(&id) = ids.iter().find(|&&id| id as usize >= size) {
            return Err(ChainError::TokenOutOfRange { id, len: size });
        }
        let mut counts = Self::zeros(size);
        for pair in ids.windows(2) {
            if let [from, to] = *pair {
                let at = from as usize * size + to as usize;
                if let Some(cell) = counts.cells.get_mut(at) {
                    *cell += 1;
                }
            }
        }
        Ok(counts)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Count of `to` following `from`.
    pub fn get(&self, from: TokenId, to: TokenId) -> Option<u32> {
        cell(&self.cells, self.size, from, to)
    }

    /// Successor counts of `from`.
    pub fn row(&self, from: TokenId) -> Option<&[u32]> {
        row(&self.cells, self.size, from)
    }

    /// Total successors observed after `from`.
    pub fn row_sum(&self, from: TokenId) -> u64 {
        self.row(from)
            .map(|r| r.iter().map(|&c| u64::from(c)).sum())
            .unwrap_or(0)
    }

    /// Divide each row by its sum. Rows summing to zero stay zero.
    pub fn normalize(self) -> TransitionMatrix {
        let size = self.size;
        let mut probs = Vec::with_capacity(self.cells.len());
        for counts in self.cells.chunks(size.max(1)) {
            let sum: u64 = counts.iter().map(|&c| u64::from(c)).sum();
            if sum == 0 {
                probs.extend(std::iter::repeat(0.0_f32).take(counts.len()));
            } else {
                let sum = sum as f64;
                probs.extend(counts.iter().map(|&c| (f64::from(c) / sum) as f32));
            }
        }
        TransitionMatrix { size, probs }
    }
}

/// Largest distance from 1.0 a stored row sum may have.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Row-stochastic transition probabilities, `size × size`, row-major.
///
/// Every row sums to 1 unless its token was never seen as a predecessor; such
/// degenerate rows are all zeros and cannot be sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    size: usize,
    probs: Vec<f32>,
}

impl TransitionMatrix {
    /// Adopt stored row-major probabilities.
    ///
    /// `probs` must hold `size²` finite, non-negative cells, and every row
    /// must sum to 1 (within [`ROW_SUM_TOLERANCE`]) or to exactly 0.
    pub fn from_raw(size: usize, probs: Vec<f32>) -> Result<Self, ChainError> {
        let expected = size * size;
        if probs.len() != expected {
            return Err(ChainError::DimensionMismatch { expected, actual: probs.len() });
        }
        if let Some(at) = probs.iter().position(|p| !p.is_finite() || *p < 0.0) {
            let row = markov_core::token_id(at / size.max(1))?;
            return Err(ChainError::InvalidWeight { row });
        }
        for (i, cells) in probs.chunks(size.max(1)).enumerate() {
            let sum: f64 = cells.iter().map(|&p| f64::from(p)).sum();
            if sum != 0.0 && (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ChainError::InvalidWeight { row: markov_core::token_id(i)? });
            }
        }
        Ok(Self { size, probs })
    }

    /// Side length, equal to the vocabulary size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// P(`to` | `from`).
    pub fn get(&self, from: TokenId, to: TokenId) -> Option<f32> {
        cell(&self.probs, self.size, from, to)
    }

    /// Successor distribution of `from`.
    pub fn row(&self, from: TokenId) -> Option<&[f32]> {
        row(&self.probs, self.size, from)
    }

    /// Sum of row `from`: ~1.0, or 0.0 for a degenerate row.
    pub fn row_sum(&self, from: TokenId) -> f64 {
        self.row(from)
            .map(|r| r.iter().map(|&p| f64::from(p)).sum())
            .unwrap_or(0.0)
    }

    /// `true` when `from` has no outgoing mass (or is unknown).
    pub fn is_degenerate(&self, from: TokenId) -> bool {
        self.row(from).map_or(true, |r| r.iter().all(|&p| p == 0.0))
    }

    /// Rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.probs.chunks(self.size.max(1))
    }

    /// All cells, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.probs
    }
}

/// Two-decimal dump, one row per line, followed by a blank line.
impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for p in row {
                write!(f, "{:4.2} ", p)?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

fn row<T>(cells: &[T], size: usize, from: TokenId) -> Option<&[T]> {
    let start = (from as usize).checked_mul(size)?;
    if from as usize >= size {
        return None;
    }
    cells.get(start..start + size)
}

fn cell<T: Copy>(cells: &[T], size: usize, from: TokenId, to: TokenId) -> Option<T> {
    if to as usize >= size {
        return None;
    }
    row(cells, size, from)?.get(to as usize).copied()
}
