// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Flow scalars: plain, single-quoted and double-quoted.

use std::iter::Peekable;
use std::str::Chars;

use crate::charset::{is_flow_indicator, is_indicator, is_white, CharSet};
use crate::error::{ErrorKind, ParseError};
use crate::node::{Node, ScalarStyle, Text};
use crate::token::TokenKind;
use crate::token_source::TokenStream;

use super::{Context, Parser};

impl<T: TokenStream> Parser<T> {
    /// `ns-plain(n, c)`: unquoted text, folded over several lines outside
    /// of implicit keys.
    ///
    /// This is the production every other alternative falls back to, so it
    /// is where repeated attempts at one position are counted.
    pub(super) fn ns_plain(&mut self, n: i32, c: Context) -> Node {
        if self.dead_end() {
            return Node::Invalid;
        }
        if !self.at(TokenKind::Text) || !self.plain_first(c) {
            return Node::Invalid;
        }
        let start = self.offset();
        let mut value = self.bump().origin.clone();
        self.nb_ns_plain_in_line(c, &mut value);
        if !c.is_key() {
            while self.attempt(|p| p.s_ns_plain_next_line(n, c, &mut value)) {}
        }
        Node::Text(Text {
            value,
            style: ScalarStyle::Plain,
            span: self.span_from(start),
        })
    }

    /// `ns-plain-first(c)`: indicators may only start a plain scalar when
    /// `?`, `:` or `-` is followed by a safe character.
    fn plain_first(&self, c: Context) -> bool {
        if !self.plain_safe(c) {
            return false;
        }
        let mut chars = self.tok.origin.chars();
        match chars.next() {
            Some('?' | ':' | '-') => chars
                .next()
                .is_some_and(|next| !is_white(next) && !(c.in_flow() && is_flow_indicator(next))),
            Some(first) => !is_indicator(first),
            None => false,
        }
    }

    /// Inside flow collections plain text excludes flow indicators.
    fn plain_safe(&self, c: Context) -> bool {
        !c.in_flow() || self.tok.matches(CharSet::PlainSafe)
    }

    /// `nb-ns-plain-in-line(c)`: further words on the same line.
    fn nb_ns_plain_in_line(&mut self, c: Context, value: &mut String) {
        loop {
            let word = self.attempt(|p| {
                let space = p.eat(TokenKind::Whitespace)?;
                if !p.at(TokenKind::Text) || !p.plain_safe(c) {
                    return None;
                }
                let word = p.bump();
                Some((space, word))
            });
            let Some((space, word)) = word else {
                return;
            };
            value.push_str(&space.origin);
            value.push_str(&word.origin);
        }
    }

    /// `s-ns-plain-next-line(n, c)`: a continuation line, folded into
    /// `value`.
    fn s_ns_plain_next_line(&mut self, n: i32, c: Context, value: &mut String) -> bool {
        self.eat(TokenKind::Whitespace);
        if self.eat(TokenKind::LineBreak).is_none() {
            return false;
        }
        let empty_lines = self.repeat(|p| {
            p.eat(TokenKind::Whitespace);
            p.eat(TokenKind::LineBreak).is_some()
        });
        if !self.s_flow_line_prefix(n) {
            return false;
        }
        if !self.continues_plain(c) {
            return false;
        }
        if empty_lines == 0 {
            value.push(' ');
        } else {
            value.push_str(&"\n".repeat(empty_lines));
        }
        value.push_str(&self.bump().origin);
        self.nb_plain_line_rest(c, value);
        true
    }

    /// Whether the current token may continue a plain scalar on a
    /// continuation line. Indicators there are text; `: `, ` #` and the line
    /// break end it. Inside flow collections brackets and quotes end it too.
    fn continues_plain(&self, c: Context) -> bool {
        let kind = self.tok.kind;
        match kind {
            TokenKind::Text => self.plain_safe(c),
            TokenKind::SequenceStart
            | TokenKind::SequenceEnd
            | TokenKind::MappingStart
            | TokenKind::MappingEnd
            | TokenKind::CollectEntry
            | TokenKind::SingleQuoteStart
            | TokenKind::SingleQuoteEnd
            | TokenKind::DoubleQuoteStart
            | TokenKind::DoubleQuoteEnd => !c.in_flow(),
            TokenKind::SequenceEntry
            | TokenKind::MappingKey
            | TokenKind::Anchor
            | TokenKind::Alias
            | TokenKind::Tag
            | TokenKind::VerbatimStart
            | TokenKind::VerbatimEnd => true,
            _ => false,
        }
    }

    /// The rest of a continuation line. The tokenizer closes the brackets
    /// and quotes it opened, so the origins concatenate to the source text.
    fn nb_plain_line_rest(&mut self, c: Context, value: &mut String) {
        loop {
            let word = self.attempt(|p| {
                let space = p.eat(TokenKind::Whitespace);
                if !p.continues_plain(c) {
                    return None;
                }
                let word = p.bump();
                Some((space, word))
            });
            let Some((space, word)) = word else {
                return;
            };
            if let Some(space) = space {
                value.push_str(&space.origin);
            }
            value.push_str(&word.origin);
        }
    }

    /// `c-single-quoted(n, c)`
    pub(super) fn c_single_quoted(&mut self, n: i32, c: Context) -> Node {
        self.quoted(n, c, ScalarStyle::SingleQuoted)
    }

    /// `c-double-quoted(n, c)`
    pub(super) fn c_double_quoted(&mut self, n: i32, c: Context) -> Node {
        self.quoted(n, c, ScalarStyle::DoubleQuoted)
    }

    fn quoted(&mut self, _n: i32, c: Context, style: ScalarStyle) -> Node {
        let (open, close, body) = match style {
            ScalarStyle::SingleQuoted => (
                TokenKind::SingleQuoteStart,
                TokenKind::SingleQuoteEnd,
                CharSet::SingleQuoted,
            ),
            _ => (
                TokenKind::DoubleQuoteStart,
                TokenKind::DoubleQuoteEnd,
                CharSet::DoubleQuoted,
            ),
        };
        let start = self.offset();
        let Some(opener) = self.eat(open) else {
            return Node::Invalid;
        };
        let mut raw = String::new();
        loop {
            let kind = self.tok.kind;
            match kind {
                _ if kind == close => break,
                TokenKind::Eof => return Node::Invalid,
                // Implicit keys are restricted to a single line.
                TokenKind::LineBreak if c.is_key() => return Node::Invalid,
                TokenKind::LineBreak => {
                    self.bump();
                    raw.push('\n');
                }
                TokenKind::Text if !self.tok.matches(body) => return Node::Invalid,
                _ => raw.push_str(&self.bump().origin),
            }
        }
        self.bump();
        let span = self.span_from(start);
        let (value, invalid) = fold_quoted(&raw, style == ScalarStyle::DoubleQuoted);
        for escape in invalid {
            self.push_error(
                ParseError::new(ErrorKind::InvalidEscape(escape), span, opener.start)
                    .with_found(format!("\\{escape}")),
            );
        }
        Node::Text(Text { value, style, span })
    }
}

/// Fold the body of a quoted scalar: trailing white before a line break and
/// leading white after it are dropped, a single line break becomes a space
/// and each empty line becomes a line feed.
///
/// Returns the value and the unknown escape characters, which are kept
/// verbatim in the value.
fn fold_quoted(raw: &str, double: bool) -> (String, Vec<char>) {
    let mut value = String::new();
    let mut invalid = Vec::new();
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if double => match chars.next() {
                Some('\n') => skip_white(&mut chars),
                Some(escape) => match unescape(escape, &mut chars) {
                    Some(decoded) => value.push(decoded),
                    None => {
                        invalid.push(escape);
                        value.push(escape);
                    }
                },
                None => value.push('\\'),
            },
            '\'' if !double && chars.peek() == Some(&'\'') => {
                chars.next();
                value.push('\'');
            }
            ' ' | '\t' => {
                let mut run = String::from(ch);
                while let Some(next) = chars.next_if(|next| is_white(*next)) {
                    run.push(next);
                }
                if chars.peek() != Some(&'\n') {
                    value.push_str(&run);
                }
            }
            '\n' => {
                skip_white(&mut chars);
                let mut empty_lines = 0;
                while chars.peek() == Some(&'\n') {
                    chars.next();
                    skip_white(&mut chars);
                    empty_lines += 1;
                }
                if empty_lines == 0 {
                    value.push(' ');
                } else {
                    value.push_str(&"\n".repeat(empty_lines));
                }
            }
            _ => value.push(ch),
        }
    }
    (value, invalid)
}

fn skip_white(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| is_white(*ch)).is_some() {}
}

/// Decode the escape after a backslash; `None` for an unknown escape.
fn unescape(escape: char, chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let decoded = match escape {
        '0' => '\0',
        'a' => '\u{07}',
        'b' => '\u{08}',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\u{0B}',
        'f' => '\u{0C}',
        'r' => '\r',
        'e' => '\u{1B}',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{A0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        'x' => return unicode_escape(chars, 2),
        'u' => return unicode_escape(chars, 4),
        'U' => return unicode_escape(chars, 8),
        _ => return None,
    };
    Some(decoded)
}

/// `digits` hex digits naming a code point. Nothing is consumed on failure.
fn unicode_escape(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let mut lookahead = chars.clone();
    let mut code = 0_u32;
    for _ in 0..digits {
        code = code * 16 + lookahead.next()?.to_digit(16)?;
    }
    let decoded = char::from_u32(code)?;
    *chars = lookahead;
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quoted_folding() {
        assert_eq!(fold_quoted("it''s", false), ("it's".to_owned(), vec![]));
        assert_eq!(fold_quoted("a  \n   b", false).0, "a b");
        assert_eq!(fold_quoted("a\n\n  b\n", false).0, "a\nb ");
        assert_eq!(fold_quoted(" a ", false).0, " a ");
        assert_eq!(fold_quoted("a\\n", false).0, "a\\n");
    }

    #[test]
    fn test_double_quoted_escapes() {
        let (value, invalid) = fold_quoted(r"tab\there\x41é\U0001F600\\\/\N", true);
        assert_eq!(value, "tab\there\u{41}\u{e9}\u{1F600}\\/\u{85}");
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_escaped_line_break_and_space() {
        assert_eq!(fold_quoted("a\\\n   b", true).0, "ab");
        assert_eq!(fold_quoted("a\\ \n b", true).0, "a  b");
    }

    #[test]
    fn test_invalid_escapes() {
        let (value, invalid) = fold_quoted(r"\q\x4", true);
        assert_eq!(value, "qx4");
        assert_eq!(invalid, vec!['q', 'x']);
    }
}
