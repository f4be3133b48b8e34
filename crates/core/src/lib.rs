#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Shared building blocks for the markov workspace: token ids, the reserved
//! terminator token, the chain error type and seeded RNG helpers.
//!
//! Contract: everything here is plain data. Per-speaker state lives in the
//! `tokenize` and `markov` crates.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Dense token identifier in `0..vocabulary.len()`.
pub type TokenId = u32;

/// Id reserved for the terminator token. Present in every vocabulary.
pub const TERMINATOR_ID: TokenId = 0;

/// Text of the terminator token.
pub const TERMINATOR: &str = ".";

/// Errors raised while interning, counting or sampling a chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The row has no outgoing mass, so nothing can be sampled from it.
    #[error("transition row {row} is degenerate (token never seen as a predecessor)")]
    DegenerateRow {
        /// token id of the row
        row: TokenId,
    },
    /// A token id does not fit the vocabulary or matrix it was used with.
    #[error("token id {id} out of range for {len} tokens")]
    TokenOutOfRange {
        /// offending id
        id: TokenId,
        /// number of known tokens
        len: usize,
    },
    /// A span points outside (or not on char boundaries of) its buffer.
    #[error("span at {offset}+{len} is outside its text buffer")]
    SpanOutOfBounds {
        /// byte offset of the span
        offset: usize,
        /// byte length of the span
        len: usize,
    },
    /// More distinct tokens than a `TokenId` can address.
    #[error("vocabulary is full at {len} tokens")]
    VocabularyFull {
        /// size reached
        len: usize,
    },
    /// A stored vocabulary is not in first-seen order or lacks the terminator.
    #[error("stored vocabulary is corrupt at entry {index}")]
    CorruptVocabulary {
        /// first bad entry
        index: usize,
    },
    /// Matrix cell count does not match the vocabulary size.
    #[error("expected {expected} matrix cells, found {actual}")]
    DimensionMismatch {
        /// `len * len`
        expected: usize,
        /// cells supplied
        actual: usize,
    },
    /// A row holds a negative or non-finite weight.
    #[error("transition row {row} holds an invalid weight")]
    InvalidWeight {
        /// token id of the row
        row: TokenId,
    },
}

/// Convert a dense index into a `TokenId`.
pub fn token_id(index: usize) -> Result<TokenId, ChainError> {
    TokenId::try_from(index).map_err(|_| ChainError::VocabularyFull { len: index })
}

/// Seeded RNG used for reproducible generation.
pub fn make_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
