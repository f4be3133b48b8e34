use std::collections::HashMap;
use std::fmt;

use markov_core::{token_id, ChainError, TokenId, TERMINATOR, TERMINATOR_ID};
use tracing::{debug, info};

use crate::hash::djb2;
use crate::span::TokenStream;

/// Frozen mapping between token text and dense ids, in first-seen order.
///
/// Id 0 is always the terminator `"."`. Only an [`Interner`] can add entries;
/// once frozen the vocabulary is read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    texts: Vec<String>,
    hashes: Vec<u64>,
    // djb2 -> ids sharing that hash, exact text decides between them
    buckets: HashMap<u64, Vec<TokenId>>,
    collisions: usize,
}

impl Vocabulary {
    fn with_terminator() -> Self {
        let hash = djb2(TERMINATOR.as_bytes());
        Self {
            texts: vec![TERMINATOR.to_string()],
            hashes: vec![hash],
            buckets: HashMap::from([(hash, vec![TERMINATOR_ID])]),
            collisions: 0,
        }
    }

    /// Rebuild a vocabulary from texts listed in id order.
    ///
    /// The first entry must be the terminator and no text may repeat.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut texts = texts.into_iter();
        match texts.next() {
            Some(first) if first.as_ref() == TERMINATOR => {}
            _ => return Err(ChainError::CorruptVocabulary { index: 0 }),
        }
        let mut interner = Interner::new();
        for (index, text) in texts.enumerate().map(|(i, t)| (i + 1, t)) {
            if interner.intern(text.as_ref())? != token_id(index)? {
                return Err(ChainError::CorruptVocabulary { index });
            }
        }
        Ok(interner.finish())
    }

    /// Number of distinct tokens, terminator included.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Never true for a vocabulary built by an [`Interner`].
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Id of `text`, if it was interned.
    pub fn id_of(&self, text: &str) -> Option<TokenId> {
        self.lookup(text, djb2(text.as_bytes()))
    }

    /// Text of token `id`.
    pub fn text_of(&self, id: TokenId) -> Option<&str> {
        self.texts.get(id as usize).map(String::as_str)
    }

    /// djb2 of token `id`.
    pub fn hash_of(&self, id: TokenId) -> Option<u64> {
        self.hashes.get(id as usize).copied()
    }

    /// Distinct texts that shared a hash with an earlier token.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// `(id, text)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> + '_ {
        (0..).zip(self.texts.iter().map(String::as_str))
    }

    /// Texts in id order.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    fn lookup(&self, text: &str, hash: u64) -> Option<TokenId> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&id| self.text_of(id) == Some(text))
    }

    fn push(&mut self, text: &str, hash: u64) -> Result<TokenId, ChainError> {
        let id = token_id(self.texts.len())?;
        self.texts.push(text.to_string());
        self.hashes.push(hash);
        self.buckets.entry(hash).or_default().push(id);
        Ok(id)
    }
}

/// Assigns ids to token texts on first sight.
#[derive(Clone, Debug)]
pub struct Interner {
    vocabulary: Vocabulary,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Fresh interner holding only the terminator at id 0.
    pub fn new() -> Self {
        Self { vocabulary: Vocabulary::with_terminator() }
    }

    /// Id for `text`, allocating the next one if it is new.
    ///
    /// A hash hit is only a candidate: the stored text must match exactly,
    /// otherwise the token is new and the collision is counted.
    pub fn intern(&mut self, text: &str) -> Result<TokenId, ChainError> {
        let hash = djb2(text.as_bytes());
        if let Some(id) = self.vocabulary.lookup(text, hash) {
            return Ok(id);
        }
        if self.vocabulary.buckets.contains_key(&hash) {
            self.vocabulary.collisions += 1;
            debug!(hash, token = text, "djb2 collision, keeping tokens apart");
        }
        self.vocabulary.push(text, hash)
    }

    /// Intern every span of `stream`, returning ids in stream order.
    pub fn intern_stream(
        &mut self,
        buf: &str,
        stream: &TokenStream,
    ) -> Result<Vec<TokenId>, ChainError> {
        let mut ids = Vec::with_capacity(stream.len());
        for span in stream {
            ids.push(self.intern(span.try_text(buf)?)?);
        }
        Ok(ids)
    }

    /// Tokens seen so far, terminator included.
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Always false; the terminator is interned up front.
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Freeze the vocabulary.
    pub fn finish(self) -> Vocabulary {
        self.vocabulary
    }
}

/// Token counts after interning one buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InternReport {
    /// tokens in the stream
    pub num_tokens: usize,
    /// distinct tokens, terminator included
    pub num_unique: usize,
}

impl InternReport {
    /// `num_tokens / num_unique²` as a percentage. Diagnostic only.
    pub fn saturation(&self) -> f64 {
        if self.num_unique == 0 {
            return 0.0;
        }
        let unique = self.num_unique as f64;
        self.num_tokens as f64 / (unique * unique) * 100.0
    }
}

impl fmt::Display for InternReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens, {} unique. Saturation {:.2}%.",
            self.num_tokens,
            self.num_unique,
            self.saturation()
        )
    }
}

/// Result of interning one buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interned {
    /// frozen vocabulary
    pub vocabulary: Vocabulary,
    /// token ids in stream order
    pub ids: Vec<TokenId>,
}

impl Interned {
    /// Counts for diagnostics.
    pub fn report(&self) -> InternReport {
        InternReport {
            num_tokens: self.ids.len(),
            num_unique: self.vocabulary.len(),
        }
    }
}

/// Intern a whole stream with a fresh interner and log the counts.
pub fn intern(buf: &str, stream: &TokenStream) -> Result<Interned, ChainError> {
    let mut interner = Interner::new();
    let ids = interner.intern_stream(buf, stream)?;
    let interned = Interned { vocabulary: interner.finish(), ids };
    let report = interned.report();
    info!(
        tokens = report.num_tokens,
        unique = report.num_unique,
        saturation = %format_args!("{:.2}%", report.saturation()),
        collisions = interned.vocabulary.collisions(),
        "interned"
    );
    Ok(interned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tokenize;

    #[test]
    fn terminator_is_always_zero() {
        let buf = "no period here";
        let interned = intern(buf, &tokenize(buf)).unwrap();
        assert_eq!(interned.vocabulary.id_of("."), Some(TERMINATOR_ID));
        assert_eq!(interned.vocabulary.text_of(TERMINATOR_ID), Some("."));
        assert_eq!(interned.vocabulary.len(), 4);
    }

    #[test]
    fn ids_follow_first_sight() {
        let buf = "the cat sat. the dog sat.";
        let interned = intern(buf, &tokenize(buf)).unwrap();
        assert_eq!(interned.ids, vec![1, 2, 3, 0, 1, 4, 3, 0]);
        let texts: Vec<&str> = interned.vocabulary.iter().map(|(_, t)| t).collect();
        assert_eq!(texts, vec![".", "the", "cat", "sat", "dog"]);
    }

    #[test]
    fn colliding_texts_get_distinct_ids() {
        assert_eq!(djb2(b"ab"), djb2(b"bA"));
        let mut interner = Interner::new();
        let ab = interner.intern("ab").unwrap();
        let ba = interner.intern("bA").unwrap();
        assert_ne!(ab, ba);
        assert_eq!(interner.intern("ab").unwrap(), ab);
        assert_eq!(interner.intern("bA").unwrap(), ba);
        let vocab = interner.finish();
        assert_eq!(vocab.collisions(), 1);
        assert_eq!(vocab.id_of("bA"), Some(ba));
        assert_eq!(vocab.hash_of(ab), vocab.hash_of(ba));
    }

    #[test]
    fn colliding_words_from_a_buffer() {
        let buf = "ab bA ab";
        let interned = intern(buf, &tokenize(buf)).unwrap();
        assert_eq!(interned.ids, vec![1, 2, 1]);
    }

    #[test]
    fn report_saturation() {
        let report = InternReport { num_tokens: 8, num_unique: 5 };
        assert!((report.saturation() - 32.0).abs() < 1e-9);
        assert_eq!(report.to_string(), "8 tokens, 5 unique. Saturation 32.00%.");
    }

    #[test]
    fn rebuild_from_texts() {
        let vocab = Vocabulary::from_texts([".", "the", "cat"]).unwrap();
        assert_eq!(vocab.id_of("cat"), Some(2));
        assert_eq!(
            Vocabulary::from_texts(["the", "."]),
            Err(ChainError::CorruptVocabulary { index: 0 })
        );
        assert_eq!(
            Vocabulary::from_texts([".", "the", "the"]),
            Err(ChainError::CorruptVocabulary { index: 2 })
        );
    }

    #[test]
    fn stream_against_wrong_buffer_fails() {
        let stream = tokenize("a longer buffer");
        let err = Interner::new().intern_stream("short", &stream).unwrap_err();
        assert!(matches!(err, ChainError::SpanOutOfBounds { .. }));
    }

    #[test]
    fn interning_is_idempotent() {
        fn prop(text: String) -> bool {
            let stream = tokenize(&text);
            match (intern(&text, &stream), intern(&text, &tokenize(&text))) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        }
        quickcheck::quickcheck(prop as fn(String) -> bool);
    }
}
