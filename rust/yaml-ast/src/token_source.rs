// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The parser's view of the token stream.
//!
//! [`TokenSource`] buffers tokens from any [`TokenStream`] behind the same
//! [`Checkpointed`] accessor the tokenizer uses for runes, and forwards raw
//! mode toggles to the stream.

use std::collections::VecDeque;
use std::rc::Rc;

use log::trace;

use crate::checkpoint::{Checkpointed, Pull};
use crate::span::{span, Position};
use crate::token::{Token, TokenKind};

/// A producer of tokens, one per call.
///
/// Implementations must keep returning [`TokenKind::Eof`] once the input is
/// exhausted.
pub trait TokenStream {
    fn next_token(&mut self) -> Token;

    /// Suspend (or resume) context-sensitive recognition of special tokens.
    ///
    /// Streams without lexical contexts can ignore this.
    fn set_raw(&mut self, _raw: bool) {}
}

impl<T: TokenStream + ?Sized> TokenStream for Box<T> {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }

    fn set_raw(&mut self, raw: bool) {
        (**self).set_raw(raw);
    }
}

/// Signature of a custom token stream constructor.
pub type TokenStreamConstructor = for<'a> fn(&'a [u8]) -> Box<dyn TokenStream + 'a>;

/// Adapts a [`TokenStream`] to [`Pull`], sharing tokens so that replays keep
/// their memoized character-set checks.
struct Feed<T>(T);

impl<T: TokenStream> Pull for Feed<T> {
    type Item = Rc<Token>;

    fn pull(&mut self) -> Rc<Token> {
        Rc::new(self.0.next_token())
    }
}

/// A checkpointable token source with raw-mode control.
pub struct TokenSource<T: TokenStream> {
    tokens: Checkpointed<Feed<T>>,
    raw: bool,
}

impl<T: TokenStream> std::fmt::Debug for TokenSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("tokens", &self.tokens)
            .field("raw", &self.raw)
            .finish()
    }
}

impl<T: TokenStream> TokenSource<T> {
    #[must_use]
    pub fn new(stream: T) -> Self {
        Self {
            tokens: Checkpointed::new(Feed(stream)),
            raw: false,
        }
    }

    /// Advance to the next token.
    pub fn next(&mut self) -> Rc<Token> {
        self.tokens.next()
    }

    /// The most recently returned token.
    #[must_use]
    pub fn current(&self) -> Option<Rc<Token>> {
        self.tokens.current()
    }

    pub fn set_checkpoint(&mut self) {
        self.tokens.set_checkpoint();
    }

    pub fn commit(&mut self) {
        self.tokens.commit();
    }

    /// Return to the innermost checkpoint; see [`Checkpointed::rollback`].
    pub fn rollback(&mut self) -> Option<Rc<Token>> {
        self.tokens.rollback()
    }

    /// Number of active checkpoints.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tokens.depth()
    }

    /// Lex the following tokens without special-token recognition.
    ///
    /// Only tokens pulled from the stream after this call are affected;
    /// tokens already buffered for replay keep their kinds.
    pub fn enter_raw(&mut self) {
        trace!("token source: enter raw mode");
        self.raw = true;
        self.tokens.source_mut().0.set_raw(true);
    }

    /// Resume context-sensitive lexing.
    pub fn exit_raw(&mut self) {
        trace!("token source: exit raw mode");
        self.raw = false;
        self.tokens.source_mut().0.set_raw(false);
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

/// A fixed list of pre-built tokens.
///
/// An EOF token positioned after the last token is synthesized once the list
/// runs out.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: VecDeque<Token>,
    end: Position,
    end_offset: usize,
}

impl TokenList {
    #[must_use]
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens: VecDeque<Token> = tokens.into_iter().collect();
        let (end, end_offset) = tokens
            .back()
            .map_or((Position::START, 0), |last| (last.end, last.span.end));
        Self {
            tokens,
            end,
            end_offset,
        }
    }

    /// Build a list from `(kind, origin)` pairs, computing positions and
    /// spans as the tokenizer would.
    #[must_use]
    pub fn from_origins<'s>(pairs: impl IntoIterator<Item = (TokenKind, &'s str)>) -> Self {
        let mut pos = Position::START;
        let mut offset = 0;
        let tokens = pairs.into_iter().map(|(kind, origin)| {
            let start = pos;
            let start_offset = offset;
            offset += origin.len();
            pos = if kind == TokenKind::LineBreak {
                start.next_line()
            } else {
                origin.chars().fold(start, |at, _| at.advance())
            };
            Token::new(kind, start, pos, span(start_offset, offset), origin)
        });
        Self::new(tokens.collect::<Vec<_>>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl TokenStream for TokenList {
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| {
            Token::new(
                TokenKind::Eof,
                self.end,
                self.end,
                span(self.end_offset, self.end_offset),
                "",
            )
        })
    }
}
