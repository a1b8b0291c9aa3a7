// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Token types produced by the tokenizer.
//!
//! A token keeps its exact source text (`origin`), so concatenating the
//! origins of a complete token stream reproduces the input. Which grammar
//! character sets the origin satisfies is computed lazily and memoized on
//! the token, since backtracking re-queries the same tokens many times.

use std::cell::Cell;

use crate::charset::CharSet;
use crate::span::{Position, Span};

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TokenKind {
    /// End of input; its origin is empty.
    #[display("end of input")]
    Eof,
    /// Byte order mark `U+FEFF`
    #[display("byte order mark")]
    Bom,
    /// `\n`, `\r\n` or `\r`
    #[display("line break")]
    LineBreak,
    /// A run of spaces and tabs
    #[display("whitespace")]
    Whitespace,
    /// A run of runes that is not any special token
    #[display("text")]
    Text,
    /// `#` starting a comment (the comment body follows as text)
    #[display("'#'")]
    Comment,
    /// `-` block sequence entry
    #[display("'-'")]
    SequenceEntry,
    /// `?` mapping key
    #[display("'?'")]
    MappingKey,
    /// `:` mapping value
    #[display("':'")]
    MappingValue,
    /// `,` flow collection entry separator
    #[display("','")]
    CollectEntry,
    #[display("'['")]
    SequenceStart,
    #[display("']'")]
    SequenceEnd,
    #[display("'{{'")]
    MappingStart,
    #[display("'}}'")]
    MappingEnd,
    /// `&` anchor property (the name follows as text)
    #[display("'&'")]
    Anchor,
    /// `*` alias node (the name follows as text)
    #[display("'*'")]
    Alias,
    /// `!` tag indicator, also the inner `!` of named and secondary handles
    #[display("'!'")]
    Tag,
    /// `<` opening a verbatim tag
    #[display("'<'")]
    VerbatimStart,
    /// `>` closing a verbatim tag
    #[display("'>' (verbatim tag end)")]
    VerbatimEnd,
    /// `|` literal block scalar
    #[display("'|'")]
    Literal,
    /// `>` folded block scalar
    #[display("'>'")]
    Folded,
    /// `-` chomping indicator in a block scalar header
    #[display("strip chomping indicator")]
    StripChomping,
    /// `+` chomping indicator in a block scalar header
    #[display("keep chomping indicator")]
    KeepChomping,
    #[display("opening '")]
    SingleQuoteStart,
    #[display("closing '")]
    SingleQuoteEnd,
    #[display("opening \"")]
    DoubleQuoteStart,
    #[display("closing \"")]
    DoubleQuoteEnd,
    /// `---`
    #[display("'---'")]
    DocumentStart,
    /// `...`
    #[display("'...'")]
    DocumentEnd,
    /// `%` starting a directive
    #[display("'%'")]
    Directive,
}

impl TokenKind {
    /// The closer that balances this opener, if any.
    #[must_use]
    pub const fn closer(self) -> Option<Self> {
        match self {
            Self::SequenceStart => Some(Self::SequenceEnd),
            Self::MappingStart => Some(Self::MappingEnd),
            Self::SingleQuoteStart => Some(Self::SingleQuoteEnd),
            Self::DoubleQuoteStart => Some(Self::DoubleQuoteEnd),
            _ => None,
        }
    }

    /// Returns `true` for tokens that close a balanced pair.
    #[must_use]
    pub const fn is_closer(self) -> bool {
        matches!(
            self,
            Self::SequenceEnd | Self::MappingEnd | Self::SingleQuoteEnd | Self::DoubleQuoteEnd
        )
    }
}

/// Memo of character-set checks: which sets were computed, and their results.
#[derive(Debug, Clone, Default)]
struct CharSetMemo {
    known: Cell<u8>,
    matched: Cell<u8>,
}

/// A positioned token with its exact source text.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Position,
    pub end: Position,
    pub span: Span,
    pub origin: String,
    memo: CharSetMemo,
}

impl Token {
    #[must_use]
    pub fn new(
        kind: TokenKind,
        start: Position,
        end: Position,
        span: Span,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            span,
            origin: origin.into(),
            memo: CharSetMemo::default(),
        }
    }

    /// Returns `true` if this token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Check whether the origin text belongs entirely to `set`.
    ///
    /// The answer is computed on first use and cached on the token.
    #[must_use]
    pub fn matches(&self, set: CharSet) -> bool {
        let bit = set.bit();
        if self.memo.known.get() & bit == 0 {
            let hit = set.matches(&self.origin);
            self.memo.known.set(self.memo.known.get() | bit);
            if hit {
                self.memo.matched.set(self.memo.matched.get() | bit);
            }
        }
        self.memo.matched.get() & bit != 0
    }

    /// Bitmap of character sets already evaluated for this token.
    #[must_use]
    pub fn evaluated_sets(&self) -> u8 {
        self.memo.known.get()
    }

    /// Number of leading spaces (tabs do not count as indentation).
    #[must_use]
    pub fn leading_spaces(&self) -> usize {
        self.origin.chars().take_while(|&ch| ch == ' ').count()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.start == other.start
            && self.end == other.end
            && self.span == other.span
            && self.origin == other.origin
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Text => write!(f, "text '{}'", self.origin),
            TokenKind::Whitespace | TokenKind::LineBreak | TokenKind::Eof => {
                write!(f, "{}", self.kind)
            }
            kind => write!(f, "{kind}"),
        }
    }
}
