#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Word/punctuation tokenizer and token interner.
//!
//! The tokenizer turns a lowercase text buffer into a `TokenStream` of
//! `(offset, len, kind)` spans that point back into the buffer. The interner
//! maps each distinct span text to a dense `TokenId`, with id 0 reserved for
//! the terminator `"."`.
//!
//! Contract: identical buffer -> identical stream -> identical id sequence.

/// djb2 hashing of token bytes.
pub mod hash;
/// Character scanner producing token spans.
pub mod scan;
/// Token span and stream types.
pub mod span;
/// Interner and frozen vocabulary.
pub mod vocab;

pub use hash::djb2;
pub use scan::{is_punct_word_char, is_word_char, tokenize};
pub use span::{TokenKind, TokenSpan, TokenStream};
pub use vocab::{intern, InternReport, Interned, Interner, Vocabulary};
