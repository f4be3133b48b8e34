#![forbid(unsafe_code)]

use std::path::PathBuf;

use markov_core::ChainError;

use crate::script::ScriptError;

/// Errors surfaced by the markov pipeline and its file formats.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
    /// Input or output file could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// file involved
        path: PathBuf,
        /// underlying failure
        #[source]
        source: std::io::Error,
    },
    /// Building or sampling a chain failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Script cleanup rejected its input.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// JSON snapshot could not be encoded or decoded.
    #[error("json snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// Bincode snapshot could not be encoded or decoded.
    #[error("bincode snapshot: {0}")]
    Bincode(#[from] bincode::Error),
    /// No chain was built for this speaker.
    #[error("unknown speaker {0:?}")]
    UnknownSpeaker(String),
}
