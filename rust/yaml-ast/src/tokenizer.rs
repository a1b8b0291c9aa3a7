// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Context-sensitive tokenizer.
//!
//! The tokenizer pulls runes through a [`Checkpointed`] accessor so that it
//! can peek ahead without consuming, and keeps a [`ContextStack`] deciding
//! which characters are special at the current point. Runs of ordinary runes
//! become [`TokenKind::Text`] tokens. When a run is ended by a special token,
//! that token is produced immediately and parked in a one-token slot for the
//! following call.
//!
//! Tokens are never dropped: concatenating the `origin` of every token up to
//! and including EOF reproduces the input exactly.

use crate::charset::is_flow_indicator;
use crate::checkpoint::Checkpointed;
use crate::context::{ContextStack, LexContext};
use crate::runes::Runes;
use crate::span::{span, Position};
use crate::token::{Token, TokenKind};
use crate::token_source::TokenStream;

/// Lazily turns source text into [`Token`]s, one per call.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    runes: Checkpointed<Runes<'a>>,
    /// Position of the next rune.
    pos: Position,
    /// Byte offset of the next rune.
    offset: usize,
    /// Special token recognized while ending a text run.
    pending: Option<Token>,
    contexts: ContextStack,
    raw: bool,
    /// Inside quotes: the previous rune started an escape (`\` or `''`).
    escaped: bool,
    /// Kind of the most recently produced token.
    last: Option<TokenKind>,
    /// A node may begin here, so node indicators are special.
    node_start: bool,
    /// Leading spaces of the current line.
    line_indent: usize,
    /// The current line started with `---`.
    line_after_marker: bool,
    /// Column of the innermost node started on the current line.
    line_node_column: Option<usize>,
    /// Kind of the previous non-whitespace token on the current line.
    line_prev: Option<TokenKind>,
    /// EOF has been returned.
    done: bool,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Tokenize raw bytes; invalid UTF-8 decodes to `U+FFFD`.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            runes: Checkpointed::new(Runes::new(bytes)),
            pos: Position::START,
            offset: 0,
            pending: None,
            contexts: ContextStack::new(),
            raw: false,
            escaped: false,
            last: None,
            node_start: true,
            line_indent: 0,
            line_after_marker: false,
            line_node_column: None,
            line_prev: None,
            done: false,
        }
    }

    /// The lexical context stack (for diagnostics and tests).
    #[must_use]
    pub fn contexts(&self) -> &ContextStack {
        &self.contexts
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Produce the next token. After the end of input, every call yields EOF.
    pub fn next_token(&mut self) -> Token {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.scan(),
        };
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        token
    }

    fn scan(&mut self) -> Token {
        let start = self.pos;
        let start_offset = self.offset;
        let mut text = String::new();
        loop {
            if let Some((kind, len)) = self.special(text.is_empty()) {
                if text.is_empty() {
                    return self.emit_special(kind, len);
                }
                let token = self.finish(TokenKind::Text, start, start_offset, text);
                let special = self.emit_special(kind, len);
                self.pending = Some(special);
                return token;
            }
            // Anything that is not special is text; EOF is always special.
            let Some(ch) = self.advance() else {
                return self.finish(TokenKind::Eof, self.pos, self.offset, String::new());
            };
            self.track_escape(ch);
            text.push(ch);
        }
    }

    /// Consume one rune, advancing the column.
    fn advance(&mut self) -> Option<char> {
        let rune = self.runes.next()?;
        self.offset += rune.width;
        self.pos = self.pos.advance();
        Some(rune.ch)
    }

    /// Check the next `n` runes against `pred` without consuming them.
    fn lookahead(&mut self, n: usize, mut pred: impl FnMut(usize, Option<char>) -> bool) -> bool {
        self.runes.set_checkpoint();
        let mut matched = true;
        for index in 0..n {
            let ch = self.runes.next().map(|rune| rune.ch);
            if !pred(index, ch) {
                matched = false;
                break;
            }
        }
        self.runes.rollback();
        matched
    }

    /// The rune `index` places ahead of the cursor, without consuming.
    fn peek(&mut self, index: usize) -> Option<char> {
        let mut found = None;
        self.lookahead(index + 1, |at, ch| {
            if at == index {
                found = ch;
            }
            true
        });
        found
    }

    /// Length of the run of runes satisfying `pred`, starting at the cursor.
    fn count_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        self.runes.set_checkpoint();
        let mut count = 0;
        while self.runes.next().is_some_and(|rune| pred(rune.ch)) {
            count += 1;
        }
        self.runes.rollback();
        count
    }

    /// Kind of the previous token, counting a pending text run.
    fn lookbehind(&self, text_empty: bool) -> Option<TokenKind> {
        if text_empty {
            self.last
        } else {
            Some(TokenKind::Text)
        }
    }

    /// Returns `true` when the rune at `index` ends a plain word.
    fn separated_at(&mut self, index: usize) -> bool {
        matches!(self.peek(index), None | Some(' ' | '\t' | '\n' | '\r'))
    }

    /// Recognize the special token starting at the cursor, if any.
    ///
    /// Returns its kind and length in runes.
    fn special(&mut self, text_empty: bool) -> Option<(TokenKind, usize)> {
        let Some(ch) = self.peek(0) else {
            return Some((TokenKind::Eof, 0));
        };
        match ch {
            '\u{FEFF}' => return Some((TokenKind::Bom, 1)),
            '\r' if self.peek(1) == Some('\n') => return Some((TokenKind::LineBreak, 2)),
            '\n' | '\r' => return Some((TokenKind::LineBreak, 1)),
            _ => {}
        }

        if text_empty && self.pos.column == 0 {
            if let LexContext::BlockScalarBody { threshold } = self.contexts.current() {
                if self.body_continues(threshold) {
                    let indent = self.count_while(|ch| ch == ' ');
                    return (indent > 0).then_some((TokenKind::Whitespace, indent));
                }
                self.contexts.pop();
            }
        }

        if matches!(ch, ' ' | '\t') {
            let len = self.count_while(|ch| matches!(ch, ' ' | '\t'));
            return Some((TokenKind::Whitespace, len));
        }
        if self.raw {
            return None;
        }

        match self.contexts.current() {
            LexContext::Comment | LexContext::BlockScalarBody { .. } => None,
            LexContext::SingleQuoted => {
                (ch == '\'' && !self.escaped && self.peek(1) != Some('\''))
                    .then_some((TokenKind::SingleQuoteEnd, 1))
            }
            LexContext::DoubleQuoted => {
                (ch == '"' && !self.escaped).then_some((TokenKind::DoubleQuoteEnd, 1))
            }
            LexContext::Tag { verbatim } => self.special_in_tag(ch, verbatim, text_empty),
            LexContext::BlockScalarHeader { .. } => match ch {
                '-' => Some((TokenKind::StripChomping, 1)),
                '+' => Some((TokenKind::KeepChomping, 1)),
                '#' if self.after_separator(text_empty) => Some((TokenKind::Comment, 1)),
                _ => None,
            },
            LexContext::Block | LexContext::Flow => self.special_in_layout(ch, text_empty),
        }
    }

    fn special_in_tag(
        &mut self,
        ch: char,
        verbatim: bool,
        text_empty: bool,
    ) -> Option<(TokenKind, usize)> {
        if verbatim {
            return (ch == '>').then_some((TokenKind::VerbatimEnd, 1));
        }
        match ch {
            '<' if text_empty && self.last == Some(TokenKind::Tag) => {
                Some((TokenKind::VerbatimStart, 1))
            }
            '!' => Some((TokenKind::Tag, 1)),
            _ if is_flow_indicator(ch) && self.contexts.in_flow() => {
                self.contexts.pop();
                self.special_in_layout(ch, text_empty)
            }
            _ => None,
        }
    }

    fn special_in_layout(&mut self, ch: char, text_empty: bool) -> Option<(TokenKind, usize)> {
        let flow = self.contexts.in_flow();
        let at_node = text_empty && self.node_start;

        if ch == '#' && self.after_separator(text_empty) {
            return Some((TokenKind::Comment, 1));
        }
        if !flow && text_empty && self.pos.column == 0 {
            if let Some(kind) = self.document_marker() {
                return Some((kind, 3));
            }
            if ch == '%' {
                return Some((TokenKind::Directive, 1));
            }
        }

        let kind = match ch {
            ':' if self.value_indicator(flow, text_empty) => TokenKind::MappingValue,
            ',' if flow => TokenKind::CollectEntry,
            '[' if flow || at_node => TokenKind::SequenceStart,
            '{' if flow || at_node => TokenKind::MappingStart,
            ']' if flow || at_node => TokenKind::SequenceEnd,
            '}' if flow || at_node => TokenKind::MappingEnd,
            '-' if !flow && at_node && self.separated_at(1) => TokenKind::SequenceEntry,
            '?' if at_node && (self.separated_at(1) || (flow && self.flow_indicator_at(1))) => {
                TokenKind::MappingKey
            }
            '\'' if at_node => TokenKind::SingleQuoteStart,
            '"' if at_node => TokenKind::DoubleQuoteStart,
            '!' if at_node => TokenKind::Tag,
            '&' if at_node => TokenKind::Anchor,
            '*' if at_node => TokenKind::Alias,
            '|' if !flow && at_node => TokenKind::Literal,
            '>' if !flow && at_node => TokenKind::Folded,
            _ => return None,
        };
        Some((kind, 1))
    }

    /// `#` starts a comment only after whitespace, a line break or at the start.
    fn after_separator(&self, text_empty: bool) -> bool {
        matches!(
            self.lookbehind(text_empty),
            None | Some(TokenKind::Whitespace | TokenKind::LineBreak | TokenKind::Bom)
        )
    }

    fn flow_indicator_at(&mut self, index: usize) -> bool {
        self.peek(index).is_some_and(is_flow_indicator)
    }

    /// `:` is a value indicator before a separator; in flow context also
    /// before a flow indicator or right after a JSON-like key.
    fn value_indicator(&mut self, flow: bool, text_empty: bool) -> bool {
        if self.separated_at(1) {
            return true;
        }
        if !flow {
            return false;
        }
        self.flow_indicator_at(1)
            || matches!(
                self.lookbehind(text_empty),
                Some(
                    TokenKind::SingleQuoteEnd
                        | TokenKind::DoubleQuoteEnd
                        | TokenKind::SequenceEnd
                        | TokenKind::MappingEnd
                )
            )
    }

    /// `---` or `...` at the cursor, followed by a separator.
    fn document_marker(&mut self) -> Option<TokenKind> {
        let kind = match self.peek(0) {
            Some('-') => TokenKind::DocumentStart,
            Some('.') => TokenKind::DocumentEnd,
            _ => return None,
        };
        let marker = if kind == TokenKind::DocumentStart { '-' } else { '.' };
        let repeated = self.lookahead(3, |_, ch| ch == Some(marker));
        (repeated && self.separated_at(3)).then_some(kind)
    }

    /// Decide at the start of a line whether it still belongs to a block
    /// scalar body: blank lines and lines indented past the threshold do.
    fn body_continues(&mut self, threshold: i32) -> bool {
        if self.document_marker().is_some() {
            return false;
        }
        let spaces = self.count_while(|ch| ch == ' ');
        let blank = matches!(self.peek(spaces), None | Some('\n' | '\r')) || {
            let white = self.count_while(|ch| matches!(ch, ' ' | '\t'));
            matches!(self.peek(white), None | Some('\n' | '\r'))
        };
        blank || i32::try_from(spaces).map_or(true, |spaces| spaces > threshold)
    }

    /// Inside quotes, remember whether the consumed rune escapes the next one.
    fn track_escape(&mut self, ch: char) {
        self.escaped = match self.contexts.current() {
            LexContext::SingleQuoted => ch == '\'' && !self.escaped,
            LexContext::DoubleQuoted => ch == '\\' && !self.escaped,
            _ => false,
        };
    }

    /// Consume `len` runes as a token of `kind` and apply its effects.
    fn emit_special(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.pos;
        let start_offset = self.offset;
        let mut origin = String::new();
        for _ in 0..len {
            if let Some(ch) = self.advance() {
                origin.push(ch);
            }
        }
        if kind == TokenKind::LineBreak {
            self.pos = start.next_line();
        }
        self.escaped = false;
        self.finish(kind, start, start_offset, origin)
    }

    /// Build the token ending at the cursor and update the lexer state.
    fn finish(
        &mut self,
        kind: TokenKind,
        start: Position,
        start_offset: usize,
        origin: String,
    ) -> Token {
        let token = Token::new(kind, start, self.pos, span(start_offset, self.offset), origin);
        self.apply_context(&token);
        self.node_start = match kind {
            TokenKind::Whitespace | TokenKind::Eof => self.node_start,
            TokenKind::Text => matches!(
                self.last,
                Some(TokenKind::Anchor | TokenKind::Tag | TokenKind::VerbatimEnd)
            ),
            TokenKind::LineBreak
            | TokenKind::Bom
            | TokenKind::SequenceEntry
            | TokenKind::MappingKey
            | TokenKind::MappingValue
            | TokenKind::CollectEntry
            | TokenKind::SequenceStart
            | TokenKind::MappingStart
            | TokenKind::DocumentStart
            | TokenKind::DocumentEnd
            | TokenKind::Tag
            | TokenKind::VerbatimEnd => true,
            _ => false,
        };
        self.last = Some(kind);
        token
    }

    fn apply_context(&mut self, token: &Token) {
        match token.kind {
            TokenKind::LineBreak => {
                self.contexts.on_line_break();
                self.line_indent = 0;
                self.line_after_marker = false;
                self.line_node_column = None;
                self.line_prev = None;
                return;
            }
            TokenKind::Whitespace => {
                if token.start.column == 0 {
                    self.line_indent = token.leading_spaces();
                }
                self.contexts
                    .pop_if(|frame| matches!(frame, LexContext::Tag { verbatim: false }));
            }
            TokenKind::DocumentStart => self.line_after_marker = true,
            TokenKind::SequenceStart | TokenKind::MappingStart => {
                self.contexts.push(LexContext::Flow);
            }
            TokenKind::SequenceEnd | TokenKind::MappingEnd => {
                self.contexts.pop_if(|frame| frame == LexContext::Flow);
            }
            TokenKind::SingleQuoteStart => self.contexts.push(LexContext::SingleQuoted),
            TokenKind::DoubleQuoteStart => self.contexts.push(LexContext::DoubleQuoted),
            TokenKind::SingleQuoteEnd | TokenKind::DoubleQuoteEnd => {
                self.contexts.pop();
            }
            TokenKind::Tag => {
                if !matches!(self.contexts.current(), LexContext::Tag { .. }) {
                    self.contexts.push(LexContext::Tag { verbatim: false });
                }
            }
            TokenKind::VerbatimStart => self.contexts.replace(LexContext::Tag { verbatim: true }),
            TokenKind::VerbatimEnd => {
                self.contexts.pop();
            }
            TokenKind::Comment => self.contexts.push(LexContext::Comment),
            TokenKind::Literal | TokenKind::Folded => {
                let threshold = if self.line_after_marker || token.start.column == 0 {
                    -1
                } else {
                    let column = self.line_node_column.unwrap_or(self.line_indent);
                    i32::try_from(column).unwrap_or(i32::MAX)
                };
                self.contexts
                    .push(LexContext::BlockScalarHeader { threshold });
            }
            _ => {}
        }
        self.track_line_node(token);
    }

    /// Remember where the innermost node of the line starts: a block scalar
    /// belongs to it, so its body must be indented past that column.
    fn track_line_node(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Eof | TokenKind::Bom | TokenKind::Comment => return,
            TokenKind::SequenceEntry | TokenKind::MappingKey => {
                self.line_node_column = Some(token.start.column);
            }
            TokenKind::Text
            | TokenKind::Anchor
            | TokenKind::Alias
            | TokenKind::Tag
            | TokenKind::SingleQuoteStart
            | TokenKind::DoubleQuoteStart
            | TokenKind::SequenceStart
            | TokenKind::MappingStart
                if matches!(
                    self.line_prev,
                    None | Some(TokenKind::SequenceEntry | TokenKind::MappingKey)
                ) =>
            {
                self.line_node_column = Some(token.start.column);
            }
            _ => {}
        }
        self.line_prev = Some(token.kind);
    }
}

impl TokenStream for Tokenizer<'_> {
    fn next_token(&mut self) -> Token {
        Tokenizer::next_token(self)
    }

    fn set_raw(&mut self, raw: bool) {
        log::trace!("tokenizer raw mode {raw} at {}", self.pos);
        self.raw = raw;
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields every token up to and including EOF, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    fn texts(input: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(input)
            .map(|token| (token.kind, token.origin))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens: Vec<Token> = Tokenizer::new("").collect();
        assert_eq!(tokens.len(), 1);
        let eof = tokens.first().unwrap();
        assert_eq!(eof.kind, Eof);
        assert_eq!(eof.origin, "");
        assert_eq!(eof.start, Position::START);
    }

    #[test]
    fn test_simple_mapping() {
        assert_eq!(
            kinds("key: value"),
            vec![Text, MappingValue, Whitespace, Text, Eof]
        );
    }

    #[test]
    fn test_colon_inside_plain_scalar() {
        assert_eq!(kinds("a:b"), vec![Text, Eof]);
        assert_eq!(kinds("http://x"), vec![Text, Eof]);
    }

    #[test]
    fn test_block_sequence() {
        assert_eq!(
            kinds("- a\n- b"),
            vec![
                SequenceEntry, Whitespace, Text, LineBreak, SequenceEntry, Whitespace, Text, Eof
            ]
        );
        // A dash glued to text is a plain scalar.
        assert_eq!(kinds("-1"), vec![Text, Eof]);
    }

    #[test]
    fn test_flow_sequence() {
        assert_eq!(
            kinds("[1, 2, 3]"),
            vec![
                SequenceStart,
                Text,
                CollectEntry,
                Whitespace,
                Text,
                CollectEntry,
                Whitespace,
                Text,
                SequenceEnd,
                Eof
            ]
        );
    }

    #[test]
    fn test_flow_indicators_are_text_in_block_scalars() {
        assert_eq!(kinds("a[b], c"), vec![Text, Whitespace, Text, Eof]);
    }

    #[test]
    fn test_json_style_value() {
        assert_eq!(
            kinds("{\"a\":b}"),
            vec![
                MappingStart,
                DoubleQuoteStart,
                Text,
                DoubleQuoteEnd,
                MappingValue,
                Text,
                MappingEnd,
                Eof
            ]
        );
    }

    #[test]
    fn test_anchor_and_alias() {
        assert_eq!(
            texts("&x 1"),
            vec![
                (Anchor, "&".to_owned()),
                (Text, "x".to_owned()),
                (Whitespace, " ".to_owned()),
                (Text, "1".to_owned()),
                (Eof, String::new()),
            ]
        );
        assert_eq!(kinds("*x"), vec![Alias, Text, Eof]);
    }

    #[test]
    fn test_quotes_and_escapes() {
        assert_eq!(
            texts("'it''s'"),
            vec![
                (SingleQuoteStart, "'".to_owned()),
                (Text, "it''s".to_owned()),
                (SingleQuoteEnd, "'".to_owned()),
                (Eof, String::new()),
            ]
        );
        assert_eq!(
            texts(r#""a\"b""#),
            vec![
                (DoubleQuoteStart, "\"".to_owned()),
                (Text, "a\\\"b".to_owned()),
                (DoubleQuoteEnd, "\"".to_owned()),
                (Eof, String::new()),
            ]
        );
        // Special characters inside quotes are text.
        assert_eq!(
            kinds("\"a: [b]\""),
            vec![
                DoubleQuoteStart,
                Text,
                Whitespace,
                Text,
                DoubleQuoteEnd,
                Eof
            ]
        );
    }

    #[test]
    fn test_tags() {
        assert_eq!(kinds("!!str a"), vec![Tag, Tag, Text, Whitespace, Text, Eof]);
        assert_eq!(
            kinds("!<tag:x> a"),
            vec![Tag, VerbatimStart, Text, VerbatimEnd, Whitespace, Text, Eof]
        );
        assert_eq!(
            kinds("[!t a]"),
            vec![SequenceStart, Tag, Text, Whitespace, Text, SequenceEnd, Eof]
        );
        assert_eq!(kinds("[!t]"), vec![SequenceStart, Tag, Text, SequenceEnd, Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("a # c: [x]\nb"),
            vec![
                Text, Whitespace, Comment, Whitespace, Text, Whitespace, Text, LineBreak, Text, Eof
            ]
        );
        // Not preceded by whitespace: part of the scalar.
        assert_eq!(kinds("a#b"), vec![Text, Eof]);
    }

    #[test]
    fn test_document_markers_and_directives() {
        assert_eq!(
            kinds("%YAML 1.2\n---\na\n..."),
            vec![
                Directive,
                Text,
                Whitespace,
                Text,
                LineBreak,
                DocumentStart,
                LineBreak,
                Text,
                LineBreak,
                DocumentEnd,
                Eof
            ]
        );
        assert_eq!(kinds("---a"), vec![Text, Eof]);
    }

    #[test]
    fn test_block_scalar() {
        assert_eq!(
            texts("k: |-\n  a: [b]\n  # c\nx: y"),
            vec![
                (Text, "k".to_owned()),
                (MappingValue, ":".to_owned()),
                (Whitespace, " ".to_owned()),
                (Literal, "|".to_owned()),
                (StripChomping, "-".to_owned()),
                (LineBreak, "\n".to_owned()),
                (Whitespace, "  ".to_owned()),
                (Text, "a:".to_owned()),
                (Whitespace, " ".to_owned()),
                (Text, "[b]".to_owned()),
                (LineBreak, "\n".to_owned()),
                (Whitespace, "  ".to_owned()),
                (Text, "#".to_owned()),
                (Whitespace, " ".to_owned()),
                (Text, "c".to_owned()),
                (LineBreak, "\n".to_owned()),
                (Text, "x".to_owned()),
                (MappingValue, ":".to_owned()),
                (Whitespace, " ".to_owned()),
                (Text, "y".to_owned()),
                (Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_block_scalar_in_compact_mapping() {
        let tokens = kinds("- run: |\n    # x\n  other: y\n");
        assert_eq!(
            tokens,
            vec![
                SequenceEntry,
                Whitespace,
                Text,
                MappingValue,
                Whitespace,
                Literal,
                LineBreak,
                Whitespace,
                Text,
                Whitespace,
                Text,
                LineBreak,
                Whitespace,
                Text,
                MappingValue,
                Whitespace,
                Text,
                LineBreak,
                Eof
            ]
        );
    }

    #[test]
    fn test_top_level_block_scalar() {
        assert_eq!(
            kinds("--- >\nfolded\n"),
            vec![DocumentStart, Whitespace, Folded, LineBreak, Text, LineBreak, Eof]
        );
    }

    #[test]
    fn test_positions() {
        let tokens: Vec<Token> = Tokenizer::new("a: b\r\n- c").collect();
        let starts: Vec<Position> = tokens.iter().map(|token| token.start).collect();
        assert_eq!(
            starts,
            vec![
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(1, 4),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
                Position::new(2, 3),
            ]
        );
        let line_break = tokens.get(4).unwrap();
        assert_eq!(line_break.origin, "\r\n");
        assert_eq!(line_break.end, Position::new(2, 0));
        assert_eq!(line_break.span.start, 4);
        assert_eq!(line_break.span.end, 6);
    }

    #[test]
    fn test_raw_mode() {
        let mut tokenizer = Tokenizer::new("!a [b]\n[");
        tokenizer.set_raw(true);
        let raw: Vec<TokenKind> = (0..4).map(|_| tokenizer.next_token().kind).collect();
        assert_eq!(raw, vec![Text, Whitespace, Text, LineBreak]);
        tokenizer.set_raw(false);
        assert_eq!(tokenizer.next_token().kind, SequenceStart);
    }

    #[test]
    fn test_eof_repeats() {
        let mut tokenizer = Tokenizer::new("a");
        assert_eq!(tokenizer.next_token().kind, Text);
        assert_eq!(tokenizer.next_token().kind, Eof);
        assert_eq!(tokenizer.next_token().kind, Eof);
    }
}
