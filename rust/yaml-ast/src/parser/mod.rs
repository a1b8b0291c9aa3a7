// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Recursive-descent YAML parser with backtracking.
//!
//! Every grammar production is a method returning a [`Node`], which is
//! [`Node::Invalid`] when the production does not match. Multi-step attempts
//! are bracketed by [`Parser::attempt`], which takes a checkpoint on the token
//! source and either commits or rolls back, so a failed production always
//! leaves the parser where it started. Alternatives are tried in the order of
//! the YAML 1.2 rule numbering and the first match wins.
//!
//! The productions are split by area:
//! - `document`: stream, documents, directives
//! - `block`: block collections, block nodes, block scalars
//! - `flow`: flow collections, flow nodes, flow pairs
//! - `scalar`: plain and quoted scalars, folding, escapes
//! - `properties`: tags, anchors, aliases

mod block;
mod document;
mod flow;
mod properties;
mod scalar;

use std::rc::Rc;

use log::debug;

use crate::balance::BalanceChecker;
use crate::dead_end::DeadEndFinder;
use crate::error::{ErrorKind, ParseError};
use crate::node::Node;
use crate::options::ParseOptions;
use crate::span::{span, Span};
use crate::token::{Token, TokenKind};
use crate::token_source::{TokenSource, TokenStream};

/// Grammar context threaded through the productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum Context {
    #[display("block-in")]
    BlockIn,
    #[display("block-out")]
    BlockOut,
    #[display("block-key")]
    BlockKey,
    #[display("flow-in")]
    FlowIn,
    #[display("flow-out")]
    FlowOut,
    #[display("flow-key")]
    FlowKey,
}

impl Context {
    /// Flow indicators end plain scalars in these contexts.
    pub(crate) const fn in_flow(self) -> bool {
        matches!(self, Self::FlowIn | Self::FlowKey)
    }

    /// Implicit keys: single line only.
    pub(crate) const fn is_key(self) -> bool {
        matches!(self, Self::BlockKey | Self::FlowKey)
    }

    /// The context of entries nested in a flow collection.
    pub(crate) const fn inside_flow(self) -> Self {
        match self {
            Self::BlockKey | Self::FlowKey => Self::FlowKey,
            _ => Self::FlowIn,
        }
    }
}

/// How an indentation requirement is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndentMode {
    /// Exactly `value` spaces.
    Strict,
    /// At least `value` spaces; the first match fixes the value.
    LowerBound,
}

/// An indentation requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Indentation {
    pub value: i32,
    pub mode: IndentMode,
}

impl Indentation {
    pub(crate) const fn strict(value: i32) -> Self {
        Self {
            value,
            mode: IndentMode::Strict,
        }
    }

    pub(crate) const fn lower_bound(value: i32) -> Self {
        Self {
            value,
            mode: IndentMode::LowerBound,
        }
    }

    /// Check `actual` spaces against the requirement. A lower bound that
    /// matches becomes strict at `actual`, so siblings must align with it.
    pub(crate) fn accept(&mut self, actual: i32) -> bool {
        match self.mode {
            IndentMode::Strict => actual == self.value,
            IndentMode::LowerBound if actual >= self.value => {
                *self = Self::strict(actual);
                true
            }
            IndentMode::LowerBound => false,
        }
    }
}

/// Result of a production, as seen by [`Parser::attempt`].
pub(crate) trait Outcome {
    fn matched(&self) -> bool;
}

impl Outcome for Node {
    fn matched(&self) -> bool {
        self.is_valid()
    }
}

impl Outcome for bool {
    fn matched(&self) -> bool {
        *self
    }
}

impl<T> Outcome for Option<T> {
    fn matched(&self) -> bool {
        self.is_some()
    }
}

impl Node {
    /// Ordered choice: this node if it matched, otherwise `alternative`.
    fn or_else(self, alternative: impl FnOnce() -> Self) -> Self {
        if self.is_valid() {
            self
        } else {
            alternative()
        }
    }
}

/// Parser state restored together with a token checkpoint.
#[derive(Debug, Clone)]
struct Saved {
    balance: BalanceChecker,
    start_of_line: bool,
    last_end: usize,
}

/// One line of a block scalar.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScalarLine {
    /// The line without its line break.
    pub text: String,
    /// The line was terminated by a line break (not the end of input).
    pub broken: bool,
}

/// Free list of line buffers for block scalars.
#[derive(Debug, Default)]
pub(crate) struct ScratchPool {
    free: Vec<Vec<ScalarLine>>,
}

impl ScratchPool {
    const MAX_FREE: usize = 8;

    pub(crate) fn take(&mut self) -> Vec<ScalarLine> {
        self.free.pop().unwrap_or_default()
    }

    pub(crate) fn give(&mut self, mut lines: Vec<ScalarLine>) {
        if self.free.len() < Self::MAX_FREE {
            lines.clear();
            self.free.push(lines);
        }
    }
}

/// Parser state.
#[derive(Debug)]
pub(crate) struct Parser<T: TokenStream> {
    tokens: TokenSource<T>,
    /// The next token to consume.
    tok: Rc<Token>,
    /// Nothing but a line break (or the start of input) was consumed on
    /// the current line.
    start_of_line: bool,
    /// End offset of the last consumed token.
    last_end: usize,
    balance: BalanceChecker,
    dead_ends: DeadEndFinder,
    errors: Vec<ParseError>,
    saved: Vec<Saved>,
    /// `%TAG` handles of the current document.
    tag_handles: Vec<(String, String)>,
    scratch: ScratchPool,
    omit_stream_wrapper: bool,
}

impl<T: TokenStream> Parser<T> {
    pub(crate) fn new(stream: T, options: &ParseOptions) -> Self {
        let mut tokens = TokenSource::new(stream);
        let tok = tokens.next();
        Self {
            tokens,
            tok,
            start_of_line: true,
            last_end: 0,
            balance: BalanceChecker::new(),
            dead_ends: DeadEndFinder::new(options.dead_end_threshold),
            errors: Vec::new(),
            saved: Vec::new(),
            tag_handles: Vec::new(),
            scratch: ScratchPool::default(),
            omit_stream_wrapper: options.omit_stream_wrapper,
        }
    }

    /// Parse the whole input.
    pub(crate) fn parse(mut self) -> (Node, Vec<ParseError>) {
        let stream = self.l_yaml_stream();
        self.check_balance();
        let root = match stream {
            Node::Stream(mut stream) if self.omit_stream_wrapper && stream.documents.len() == 1 => {
                stream.documents.pop().unwrap_or(Node::Invalid)
            }
            node => node,
        };
        (root, self.errors)
    }

    // Token access

    /// Consume the current token and return it. EOF is never consumed.
    fn bump(&mut self) -> Rc<Token> {
        let consumed = Rc::clone(&self.tok);
        if consumed.kind == TokenKind::Eof {
            return consumed;
        }
        if !self
            .balance
            .add(consumed.kind, consumed.start, consumed.span)
        {
            self.fatal(ErrorKind::UnbalancedClosing, &consumed);
        }
        self.last_end = consumed.span.end;
        self.start_of_line = match consumed.kind {
            TokenKind::LineBreak => true,
            TokenKind::Bom => self.start_of_line,
            _ => false,
        };
        self.tok = self.tokens.next();
        consumed
    }

    /// Consume the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> Option<Rc<Token>> {
        (self.tok.kind == kind).then(|| self.bump())
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.tok.kind == kind
    }

    /// Byte offset of the current token; increases whenever a token is consumed.
    fn offset(&self) -> usize {
        self.tok.span.start
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        span(start, self.last_end.max(start))
    }

    // Checkpoints

    fn set_checkpoint(&mut self) {
        self.tokens.set_checkpoint();
        self.saved.push(Saved {
            balance: self.balance.snapshot(),
            start_of_line: self.start_of_line,
            last_end: self.last_end,
        });
    }

    fn commit(&mut self) {
        self.tokens.commit();
        self.saved.pop();
    }

    fn rollback(&mut self) {
        if let Some(tok) = self.tokens.rollback() {
            self.tok = tok;
        }
        if let Some(saved) = self.saved.pop() {
            self.balance.restore(saved.balance);
            self.start_of_line = saved.start_of_line;
            self.last_end = saved.last_end;
        }
    }

    /// Run `production` speculatively: keep its progress if it matched,
    /// otherwise restore the position it started from.
    fn attempt<R: Outcome>(&mut self, production: impl FnOnce(&mut Self) -> R) -> R {
        self.set_checkpoint();
        let result = production(self);
        if result.matched() {
            self.commit();
        } else {
            self.rollback();
        }
        result
    }

    /// Run `scan` and restore the position it started from, whatever it
    /// returns. Use [`Parser::skip`] inside it to move forward.
    fn lookahead<R>(&mut self, scan: impl FnOnce(&mut Self) -> R) -> R {
        self.set_checkpoint();
        let result = scan(self);
        self.rollback();
        result
    }

    /// Step over the current token without tracking balance or errors.
    fn skip(&mut self) {
        if !self.at(TokenKind::Eof) {
            self.tok = self.tokens.next();
        }
    }

    /// Apply `production` as long as it matches and makes progress.
    fn repeat(&mut self, mut production: impl FnMut(&mut Self) -> bool) -> usize {
        let mut count = 0;
        loop {
            let before = self.offset();
            let matched = self.attempt(|p| production(p) && p.offset() > before);
            if !matched {
                return count;
            }
            count += 1;
        }
    }

    // Errors

    /// Record an error at `token`; repeats from backtracking are dropped.
    fn error(&mut self, kind: ErrorKind, token: &Token) {
        let error = ParseError::new(kind, token.span, token.start).with_found(token.to_string());
        self.push_error(error);
    }

    fn fatal(&mut self, kind: ErrorKind, token: &Token) {
        self.error(kind, token);
    }

    fn push_error(&mut self, error: ParseError) {
        if self
            .errors
            .iter()
            .any(|seen| seen.kind == error.kind && seen.span == error.span)
        {
            return;
        }
        debug!("parse error: {error}");
        self.errors.push(error);
    }

    /// Report the innermost opener left unclosed at the end of input.
    fn check_balance(&mut self) {
        if let Some(open) = self.balance.last_unmatched().copied() {
            let error = ParseError::new(
                ErrorKind::UnbalancedOpening {
                    expected: open.expected.to_string(),
                },
                open.span,
                open.position,
            )
            .with_expected(vec![open.expected.to_string()]);
            self.push_error(error);
        }
    }

    /// Count an attempt at the current position; report a dead end once the
    /// threshold is exceeded.
    fn dead_end(&mut self) -> bool {
        let tok = Rc::clone(&self.tok);
        if self.dead_ends.mark(&tok) {
            self.fatal(ErrorKind::DeadEnd, &tok);
            return true;
        }
        false
    }

    // Separation and indentation (YAML 1.2 chapter 6)

    /// Spaces of indentation at the current token, if it starts a line.
    fn indent_spaces(&self) -> Option<i32> {
        if !self.start_of_line {
            return None;
        }
        let spaces = if self.at(TokenKind::Whitespace) {
            self.tok.leading_spaces()
        } else {
            0
        };
        Some(i32::try_from(spaces).unwrap_or(i32::MAX))
    }

    /// `s-indent(n)`: consume the indentation of a line if it satisfies `indent`.
    fn s_indent(&mut self, indent: &mut Indentation) -> bool {
        let Some(spaces) = self.indent_spaces() else {
            return false;
        };
        let mut trial = *indent;
        if !trial.accept(spaces) {
            return false;
        }
        // Tabs after the indentation would be content, not indentation.
        if self.at(TokenKind::Whitespace) {
            if usize::try_from(spaces).ok() != Some(self.tok.origin.len()) {
                return false;
            }
            self.bump();
        }
        *indent = trial;
        true
    }

    /// `s-indent(<=n)` style check used by prefixes: at least `n` spaces.
    fn s_flow_line_prefix(&mut self, n: i32) -> bool {
        match self.indent_spaces() {
            Some(spaces) if spaces >= n => {
                self.eat(TokenKind::Whitespace);
                true
            }
            _ => false,
        }
    }

    /// `s-separate-in-line`
    fn s_separate_in_line(&mut self) -> bool {
        self.eat(TokenKind::Whitespace).is_some() || self.start_of_line
    }

    /// `c-nb-comment-text`: `#` and the rest of the line.
    fn c_nb_comment_text(&mut self) -> bool {
        if self.eat(TokenKind::Comment).is_none() {
            return false;
        }
        while !matches!(self.tok.kind, TokenKind::LineBreak | TokenKind::Eof) {
            self.bump();
        }
        true
    }

    /// `b-comment`: a line break or the end of input.
    fn b_comment(&mut self) -> bool {
        self.eat(TokenKind::LineBreak).is_some() || self.at(TokenKind::Eof)
    }

    /// `s-b-comment`
    fn s_b_comment(&mut self) -> bool {
        self.attempt(|p| {
            if p.s_separate_in_line() {
                p.c_nb_comment_text();
            }
            p.b_comment()
        })
    }

    /// `l-comment`: a line holding only a comment or whitespace.
    fn l_comment(&mut self) -> bool {
        self.attempt(|p| {
            if !p.s_separate_in_line() {
                return false;
            }
            p.c_nb_comment_text();
            p.b_comment()
        })
    }

    /// `s-l-comments`
    fn s_l_comments(&mut self) -> bool {
        if !self.s_b_comment() && !self.start_of_line {
            return false;
        }
        self.repeat(Self::l_comment);
        true
    }

    /// `s-separate-lines(n)`
    fn s_separate_lines(&mut self, n: i32) -> bool {
        let multi_line = self.attempt(|p| {
            let before = p.offset();
            p.s_l_comments() && p.s_flow_line_prefix(n) && p.offset() > before
        });
        multi_line || self.s_separate_in_line()
    }

    /// `s-separate(n, c)`
    fn s_separate(&mut self, n: i32, c: Context) -> bool {
        if c.is_key() {
            self.s_separate_in_line()
        } else {
            self.s_separate_lines(n)
        }
    }

    /// Optional separation: consume it if present.
    fn s_separate_opt(&mut self, n: i32, c: Context) {
        self.attempt(|p| p.s_separate(n, c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_lower_bound_freezes() {
        let mut indent = Indentation::lower_bound(1);
        assert!(!indent.accept(0));
        assert!(indent.accept(3));
        assert_eq!(indent, Indentation::strict(3));
        assert!(!indent.accept(4));
        assert!(indent.accept(3));
    }

    #[test]
    fn test_context_helpers() {
        assert!(Context::FlowIn.in_flow());
        assert!(!Context::FlowOut.in_flow());
        assert!(Context::BlockKey.is_key());
        assert_eq!(Context::BlockKey.inside_flow(), Context::FlowKey);
        assert_eq!(Context::FlowOut.inside_flow(), Context::FlowIn);
        assert_eq!(Context::BlockIn.to_string(), "block-in");
    }

    #[test]
    fn test_scratch_pool_reuses_buffers() {
        let mut pool = ScratchPool::default();
        let mut lines = pool.take();
        lines.push(ScalarLine::default());
        let capacity = lines.capacity();
        pool.give(lines);
        let reused = pool.take();
        assert!(reused.is_empty());
        assert_eq!(reused.capacity(), capacity);
    }
}
