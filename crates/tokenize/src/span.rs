use markov_core::ChainError;

/// Token class assigned by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// run of letters, `-`, `_` or `'`
    Word,
    /// single `, ; : . ! ?`
    PunctuationWord,
}

/// A token as a byte range into the buffer it was scanned from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    /// byte offset of the first character
    pub offset: usize,
    /// byte length
    pub len: usize,
    /// word or punctuation
    pub kind: TokenKind,
}

impl TokenSpan {
    /// Word span covering `offset..offset + len`.
    pub fn word(offset: usize, len: usize) -> Self {
        Self { offset, len, kind: TokenKind::Word }
    }

    /// Single punctuation character at `offset`.
    pub fn punctuation(offset: usize, len: usize) -> Self {
        Self { offset, len, kind: TokenKind::PunctuationWord }
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The span's text inside `buf`, if the span fits it.
    pub fn text<'a>(&self, buf: &'a str) -> Option<&'a str> {
        buf.get(self.offset..self.end())
    }

    /// Like [`TokenSpan::text`] but reports a missing range as an error.
    pub fn try_text<'a>(&self, buf: &'a str) -> Result<&'a str, ChainError> {
        self.text(buf).ok_or(ChainError::SpanOutOfBounds {
            offset: self.offset,
            len: self.len,
        })
    }
}

/// Ordered, non-overlapping spans over one buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStream {
    spans: Vec<TokenSpan>,
}

impl From<Vec<TokenSpan>> for TokenStream {
    fn from(spans: Vec<TokenSpan>) -> Self {
        Self { spans }
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a TokenSpan;
    type IntoIter = std::slice::Iter<'a, TokenSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl TokenStream {
    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// `true` when no token was found.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate spans in buffer order.
    pub fn iter(&self) -> std::slice::Iter<'_, TokenSpan> {
        self.spans.iter()
    }

    /// Spans as a slice.
    pub fn as_slice(&self) -> &[TokenSpan] {
        &self.spans
    }

    /// Resolve every span against `buf`. Spans that do not fit are skipped.
    pub fn texts<'a>(&'a self, buf: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.spans.iter().filter_map(move |span| span.text(buf))
    }
}
