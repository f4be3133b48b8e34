use crate::span::{TokenSpan, TokenStream};

/// Letters, hyphen, underscore and apostrophe build words.
pub fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '-' || c == '_' || c == '\''
}

/// Each of `, ; : . ! ?` is a token on its own.
pub fn is_punct_word_char(c: char) -> bool {
    matches!(c, ',' | ';' | ':' | '.' | '!' | '?')
}

/// Scan `text` left to right into word and punctuation spans.
///
/// A punctuation character flushes the open word and is emitted as its own
/// span. Any other non-word character (whitespace, digits, symbols) only
/// flushes the open word. The word still open at the end of the buffer is
/// flushed too.
pub fn tokenize(text: &str) -> TokenStream {
    let mut spans = Vec::new();
    // start of the open word run
    let mut start: Option<usize> = None;

    for (at, c) in text.char_indices() {
        if is_punct_word_char(c) {
            if let Some(s) = start.take() {
                spans.push(TokenSpan::word(s, at - s));
            }
            spans.push(TokenSpan::punctuation(at, c.len_utf8()));
        } else if is_word_char(c) {
            if start.is_none() {
                start = Some(at);
            }
        } else if let Some(s) = start.take() {
            spans.push(TokenSpan::word(s, at - s));
        }
    }
    if let Some(s) = start {
        spans.push(TokenSpan::word(s, text.len() - s));
    }

    TokenStream::from(spans)
}
