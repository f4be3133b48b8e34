#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Successor sampling strategies over one transition row: weighted draw and
//! greedy argmax.
//!
//! Contract: a row without outgoing mass is reported as
//! `ChainError::DegenerateRow`, never sampled.

/// Most likely successor.
pub mod greedy;
/// Draw proportional to row weights.
pub mod weighted;

pub use greedy::argmax;
pub use weighted::sample;
