#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Per-speaker first-order Markov chains over dialogue transcripts.
//!
//! A transcript tagged with `>NAME` lines is grouped by speaker; each
//! speaker's text is tokenized into words and single punctuation marks,
//! interned into dense ids (id 0 is always `"."`), and the adjacency counts
//! are normalized into a row-stochastic matrix that can be sampled.
//!
//! Layout (important files):
//! - `transcript.rs`: `>NAME` tagged text -> per-speaker buffers
//! - `script.rs`: raw play script -> tagged text (`preprocess` binary)
//! - `matrix.rs`: adjacency counting, normalization, two-decimal dump
//! - `chain.rs`: `ChainModel` and the `Chain` sampling/generation trait
//! - `corpus.rs`: all speakers, built in parallel with rayon
//! - `store.rs`: JSON / bincode snapshots and `FrozenChain`
//! - `bin/markov.rs`: `markov <input-file> [output-file]`

/// Chain model and generation.
pub mod chain;
/// Build and generation settings, overridable from the environment.
pub mod config;
/// Per-speaker chains of a whole transcript.
pub mod corpus;
/// Pipeline error type.
pub mod error;
/// Tracing subscriber setup for the binaries.
pub mod logging;
/// Transition counts and probabilities.
pub mod matrix;
/// Play script cleanup.
pub mod script;
/// Snapshot persistence.
pub mod store;
/// Speaker grouping.
pub mod transcript;

pub use chain::{render, Chain, ChainModel};
pub use config::{BuildConfig, GenerateConfig};
pub use corpus::Corpus;
pub use error::MarkovError;
pub use markov_core::{ChainError, TokenId, TERMINATOR, TERMINATOR_ID};
pub use matrix::{TransitionCounts, TransitionMatrix};
pub use script::{clean, ScriptError};
pub use store::{ChainSnapshot, CorpusSnapshot, Format, FrozenChain};
pub use transcript::{SpeakerText, Transcript};
