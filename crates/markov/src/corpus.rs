#![forbid(unsafe_code)]

use markov_core::ChainError;
use rayon::prelude::*;
use tracing::info;

use crate::chain::ChainModel;
use crate::config::BuildConfig;
use crate::transcript::{SpeakerText, Transcript};

/// One chain per speaker, in the transcript's first-seen speaker order.
#[derive(Clone, Debug)]
pub struct Corpus {
    chains: Vec<ChainModel>,
}

impl Corpus {
    /// Build every speaker's chain. Speakers share nothing, so with
    /// `config.parallel` they are built on the rayon pool.
    pub fn build(transcript: Transcript, config: &BuildConfig) -> Result<Self, ChainError> {
        let speakers = transcript.into_speakers();
        info!(speakers = speakers.len(), parallel = config.parallel, "building chains");
        let chains = if config.parallel {
            speakers
                .into_par_iter()
                .map(build_one)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            speakers
                .into_iter()
                .map(build_one)
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Self { chains })
    }

    /// Number of speakers.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// `true` when the transcript had no speakers.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Chain of `name`.
    pub fn get(&self, name: &str) -> Option<&ChainModel> {
        self.chains.iter().find(|c| c.name() == name)
    }

    /// Chains in speaker order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChainModel> {
        self.chains.iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a ChainModel;
    type IntoIter = std::slice::Iter<'a, ChainModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.iter()
    }
}

fn build_one(speaker: SpeakerText) -> Result<ChainModel, ChainError> {
    ChainModel::build(speaker.name, speaker.text)
}
