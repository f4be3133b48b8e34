#![forbid(unsafe_code)]

use markov_core::{ChainError, TokenId, TERMINATOR_ID};
use rand::Rng;
use tokenize::{intern, is_punct_word_char, tokenize, InternReport, Interned, TokenStream, Vocabulary};
use tracing::{debug, info, info_span};

use crate::matrix::{TransitionCounts, TransitionMatrix};

/// Anything that can be walked as a first-order chain: a vocabulary plus a
/// row-stochastic matrix over it.
pub trait Chain {
    /// Token texts by id.
    fn vocabulary(&self) -> &Vocabulary;

    /// Normalized transitions.
    fn matrix(&self) -> &TransitionMatrix;

    /// Draw the successor of `current`.
    fn sample_next<R: Rng + ?Sized>(
        &self,
        current: TokenId,
        rng: &mut R,
    ) -> Result<TokenId, ChainError> {
        let row = successors(self.matrix(), current)?;
        sampler::sample(current, row, rng)
    }

    /// Most likely successor of `current`.
    fn sample_greedy(&self, current: TokenId) -> Result<TokenId, ChainError> {
        let row = successors(self.matrix(), current)?;
        sampler::argmax(current, row)
    }

    /// Walk from `start` for at most `max_tokens` steps.
    ///
    /// Stops after emitting the terminator. `start` itself is not part of the
    /// output. A degenerate `start` row is an error; a degenerate row reached
    /// later ends the walk with what was produced so far.
    fn generate<R: Rng + ?Sized>(
        &self,
        start: TokenId,
        max_tokens: usize,
        rng: &mut R,
    ) -> Result<Vec<TokenId>, ChainError> {
        let mut out = Vec::new();
        let mut current = start;
        while out.len() < max_tokens {
            let next = match self.sample_next(current, rng) {
                Ok(next) => next,
                Err(ChainError::DegenerateRow { row }) if !out.is_empty() => {
                    debug!(row, produced = out.len(), "walk hit a dead end");
                    break;
                }
                Err(err) => return Err(err),
            };
            out.push(next);
            if next == TERMINATOR_ID {
                break;
            }
            current = next;
        }
        Ok(out)
    }

    /// [`Chain::generate`] rendered back to text.
    fn generate_text<R: Rng + ?Sized>(
        &self,
        start: TokenId,
        max_tokens: usize,
        rng: &mut R,
    ) -> Result<String, ChainError> {
        let ids = self.generate(start, max_tokens, rng)?;
        Ok(render(self.vocabulary(), &ids))
    }

    /// Where generation should begin: the terminator if anything ever
    /// followed it (sentence start), else the first token with successors.
    fn start_token(&self) -> TokenId {
        let matrix = self.matrix();
        (0..)
            .take(matrix.size())
            .find(|&id| !matrix.is_degenerate(id))
            .unwrap_or(TERMINATOR_ID)
    }
}

fn successors(matrix: &TransitionMatrix, current: TokenId) -> Result<&[f32], ChainError> {
    matrix.row(current).ok_or(ChainError::TokenOutOfRange {
        id: current,
        len: matrix.size(),
    })
}

/// Join token texts: words separated by spaces, punctuation glued to the
/// word before it. Unknown ids are skipped.
pub fn render(vocabulary: &Vocabulary, ids: &[TokenId]) -> String {
    let mut out = String::new();
    for text in ids.iter().filter_map(|&id| vocabulary.text_of(id)) {
        let glued = !text.is_empty() && text.chars().all(is_punct_word_char);
        if !out.is_empty() && !glued {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}

/// One speaker's chain, built once from that speaker's whole text.
#[derive(Clone, Debug)]
pub struct ChainModel {
    name: String,
    text: String,
    stream: TokenStream,
    ids: Vec<TokenId>,
    vocabulary: Vocabulary,
    matrix: TransitionMatrix,
}

impl ChainModel {
    /// Tokenize, intern, count and normalize `text`.
    pub fn build(name: impl Into<String>, text: impl Into<String>) -> Result<Self, ChainError> {
        let name = name.into();
        let text = text.into();
        let _span = info_span!("chain", speaker = %name).entered();

        let stream = tokenize(&text);
        info!(words = stream.len(), "tokenized");
        let Interned { vocabulary, ids } = intern(&text, &stream)?;
        let matrix = TransitionCounts::count(&ids, vocabulary.len())?.normalize();
        debug!(size = matrix.size(), "graphed");

        Ok(Self { name, text, stream, ids, vocabulary, matrix })
    }

    /// Speaker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The buffer every span points into.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Token spans in text order.
    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    /// Token ids in text order.
    pub fn ids(&self) -> &[TokenId] {
        &self.ids
    }

    /// Total and unique token counts.
    pub fn report(&self) -> InternReport {
        InternReport {
            num_tokens: self.ids.len(),
            num_unique: self.vocabulary.len(),
        }
    }
}

impl Chain for ChainModel {
    fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }
}
