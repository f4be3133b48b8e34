#![forbid(unsafe_code)]

use std::path::Path;

use markov_core::ChainError;
use serde::{Deserialize, Serialize};
use tokenize::Vocabulary;

use crate::chain::{Chain, ChainModel};
use crate::corpus::Corpus;
use crate::error::MarkovError;
use crate::matrix::TransitionMatrix;

/// On-disk encoding, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// pretty-printed JSON
    Json,
    /// compact bincode
    Bincode,
}

impl Format {
    /// `.bin` means bincode, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Format::Bincode,
            _ => Format::Json,
        }
    }
}

/// A speaker's vocabulary (id order) and row-major matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChainSnapshot {
    /// speaker name
    pub name: String,
    /// token texts, index = id
    pub tokens: Vec<String>,
    /// `tokens.len()²` probabilities, row-major
    pub matrix: Vec<f32>,
}

impl ChainSnapshot {
    /// Copy out what is needed to sample again later.
    pub fn capture(chain: &ChainModel) -> Self {
        Self {
            name: chain.name().to_string(),
            tokens: chain.vocabulary().texts().to_vec(),
            matrix: chain.matrix().as_slice().to_vec(),
        }
    }

    /// Validate and turn back into a sampleable chain.
    pub fn restore(self) -> Result<FrozenChain, ChainError> {
        let vocabulary = Vocabulary::from_texts(&self.tokens)?;
        let matrix = TransitionMatrix::from_raw(vocabulary.len(), self.matrix)?;
        Ok(FrozenChain { name: self.name, vocabulary, matrix })
    }
}

/// Every speaker of a corpus.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CorpusSnapshot {
    /// speakers in corpus order
    pub speakers: Vec<ChainSnapshot>,
}

impl CorpusSnapshot {
    /// Snapshot all chains.
    pub fn capture(corpus: &Corpus) -> Self {
        Self { speakers: corpus.iter().map(ChainSnapshot::capture).collect() }
    }

    /// Encode in `format`.
    pub fn to_bytes(&self, format: Format) -> Result<Vec<u8>, MarkovError> {
        Ok(match format {
            Format::Json => serde_json::to_vec_pretty(self)?,
            Format::Bincode => bincode::serialize(self)?,
        })
    }

    /// Decode from `format`.
    pub fn from_bytes(bytes: &[u8], format: Format) -> Result<Self, MarkovError> {
        Ok(match format {
            Format::Json => serde_json::from_slice(bytes)?,
            Format::Bincode => bincode::deserialize(bytes)?,
        })
    }

    /// Write to `path`, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MarkovError> {
        let path = path.as_ref();
        let bytes = self.to_bytes(Format::from_path(path))?;
        std::fs::write(path, bytes).map_err(|source| MarkovError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read from `path`, format chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MarkovError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MarkovError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, Format::from_path(path))
    }

    /// Restore every speaker.
    pub fn restore(self) -> Result<Vec<FrozenChain>, ChainError> {
        self.speakers.into_iter().map(ChainSnapshot::restore).collect()
    }
}

/// A chain loaded from a snapshot: no text, only what sampling needs.
#[derive(Clone, Debug, PartialEq)]
pub struct FrozenChain {
    name: String,
    vocabulary: Vocabulary,
    matrix: TransitionMatrix,
}

impl FrozenChain {
    /// Speaker name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Chain for FrozenChain {
    fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::transcript::Transcript;
    use markov_core::make_rng;

    fn corpus() -> Corpus {
        let play = ">ROMEO\nthe cat sat. the dog sat.\n>NURSE\ngood night\n";
        Corpus::build(Transcript::parse(play), &BuildConfig::default()).unwrap()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("chains.bin")), Format::Bincode);
        assert_eq!(Format::from_path(Path::new("markov_chains.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Json);
    }

    #[test]
    fn json_file_restores_sampling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markov_chains.json");
        CorpusSnapshot::capture(&corpus()).save(&path).unwrap();

        let chains = CorpusSnapshot::load(&path).unwrap().restore().unwrap();
        assert_eq!(chains.len(), 2);
        let romeo = &chains[0];
        assert_eq!(romeo.name(), "romeo");
        let the = romeo.vocabulary().id_of("the").unwrap();
        let cat = romeo.vocabulary().id_of("cat").unwrap();
        assert_eq!(romeo.matrix().get(the, cat), Some(0.5));

        let mut a = make_rng(8);
        let mut b = make_rng(8);
        let fresh = corpus();
        let live = fresh.get("romeo").unwrap();
        assert_eq!(
            romeo.generate(the, 16, &mut a).unwrap(),
            live.generate(the, 16, &mut b).unwrap()
        );
    }

    #[test]
    fn bincode_file_matches_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.bin");
        let snapshot = CorpusSnapshot::capture(&corpus());
        snapshot.save(&path).unwrap();
        assert_eq!(CorpusSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn mismatched_matrix_is_rejected() {
        let snapshot = ChainSnapshot {
            name: "ghost".into(),
            tokens: vec![".".into(), "boo".into()],
            matrix: vec![0.0; 3],
        };
        assert_eq!(
            snapshot.restore().unwrap_err(),
            ChainError::DimensionMismatch { expected: 4, actual: 3 }
        );
    }

    #[test]
    fn overweight_rows_are_rejected() {
        let snapshot = ChainSnapshot {
            name: "ghost".into(),
            tokens: vec![".".into(), "boo".into()],
            matrix: vec![f32::MAX, f32::MAX, 0.0, 0.0],
        };
        assert_eq!(snapshot.restore().unwrap_err(), ChainError::InvalidWeight { row: 0 });
    }

    #[test]
    fn hand_edited_json_restores_only_valid_rows() {
        let json = br#"{"speakers":[{"name":"ghost","tokens":[".","boo"],"matrix":[0.0,1.0,0.5,0.0]}]}"#;
        let snapshot = CorpusSnapshot::from_bytes(json, Format::Json).unwrap();
        assert_eq!(snapshot.restore().unwrap_err(), ChainError::InvalidWeight { row: 1 });

        let json = br#"{"speakers":[{"name":"ghost","tokens":[".","boo"],"matrix":[0.0,1.0,0.0,0.0]}]}"#;
        let chains = CorpusSnapshot::from_bytes(json, Format::Json).unwrap().restore().unwrap();
        assert_eq!(chains[0].sample_next(0, &mut make_rng(1)), Ok(1));
        assert_eq!(
            chains[0].sample_next(1, &mut make_rng(1)),
            Err(ChainError::DegenerateRow { row: 1 })
        );
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let err = CorpusSnapshot::load("/nope/markov_chains.json").unwrap_err();
        assert!(matches!(err, MarkovError::Io { .. }));
    }
}
