// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Block structure parsing: block nodes, sequences, mappings and scalars.

use crate::node::{CollectionStyle, Mapping, MappingEntry, Node, ScalarStyle, Sequence, Text};
use crate::span::span;
use crate::token::TokenKind;
use crate::token_source::TokenStream;

use super::{Context, Indentation, Parser, ScalarLine};

/// Trailing line break handling of a block scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    /// `-`: no final line break.
    Strip,
    /// Default: a single final line break.
    Clip,
    /// `+`: every trailing line break.
    Keep,
}

/// `seq-spaces(n, c)`: block sequences may sit at their parent's indentation
/// when they are the value of a block mapping entry.
const fn seq_spaces(n: i32, c: Context) -> i32 {
    match c {
        Context::BlockOut => n - 1,
        _ => n,
    }
}

impl<T: TokenStream> Parser<T> {
    /// `s-l+block-node(n, c)`
    pub(super) fn s_l_block_node(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.s_l_block_in_block(n, c))
            .or_else(|| self.attempt(|p| p.s_l_flow_in_block(n)))
    }

    /// `s-l+block-in-block(n, c)`
    fn s_l_block_in_block(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.s_l_block_scalar(n, c))
            .or_else(|| self.attempt(|p| p.s_l_block_collection(n, c)))
    }

    /// `s-l+flow-in-block(n)`: a flow node on its own, ended by comments.
    fn s_l_flow_in_block(&mut self, n: i32) -> Node {
        if !self.s_separate(n + 1, Context::FlowOut) {
            return Node::Invalid;
        }
        let node = self.ns_flow_node(n + 1, Context::FlowOut);
        if !node.is_valid() || !self.s_l_comments() {
            return Node::Invalid;
        }
        node
    }

    /// `s-l+block-scalar(n, c)`
    fn s_l_block_scalar(&mut self, n: i32, c: Context) -> Node {
        if !self.s_separate(n + 1, c) {
            return Node::Invalid;
        }
        let start = self.offset();
        let properties = self.attempt(|p| {
            let properties = p.c_ns_properties(n + 1, c);
            if properties.is_valid() && p.s_separate(n + 1, c) {
                properties
            } else {
                Node::Invalid
            }
        });
        let kind = self.tok.kind;
        let scalar = match kind {
            TokenKind::Literal => self.c_l_block_scalar(n, ScalarStyle::Literal),
            TokenKind::Folded => self.c_l_block_scalar(n, ScalarStyle::Folded),
            _ => Node::Invalid,
        };
        self.with_properties(properties, scalar, start)
    }

    /// `s-l+block-collection(n, c)`: optional properties, then a block
    /// sequence or mapping starting on the next line.
    ///
    /// Properties on the first line may also belong to the first key of a
    /// mapping (`&a key: value`), so the collection is retried without them.
    fn s_l_block_collection(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| {
            if !p.s_separate(n + 1, c) {
                return Node::Invalid;
            }
            let start = p.offset();
            let properties = p.c_ns_properties(n + 1, c);
            if !properties.is_valid() {
                return Node::Invalid;
            }
            let collection = p.l_block_collection(n, c);
            p.with_properties(properties, collection, start)
        })
        .or_else(|| self.attempt(|p| p.l_block_collection(n, c)))
    }

    /// The comments ending the current line and the collection below them.
    fn l_block_collection(&mut self, n: i32, c: Context) -> Node {
        if !self.s_l_comments() {
            return Node::Invalid;
        }
        self.attempt(|p| p.l_block_sequence(seq_spaces(n, c)))
            .or_else(|| self.attempt(|p| p.l_block_mapping(n)))
    }

    /// Entries of a block collection, one per line at the same indentation.
    ///
    /// A compact collection starts on the current line, right after the
    /// `-` or `?` of its parent, so its first entry is not preceded by
    /// indentation.
    fn block_entries(
        &mut self,
        mut indent: Indentation,
        compact: bool,
        entry: fn(&mut Self, i32) -> Node,
    ) -> (Vec<Node>, usize) {
        let mut entries = Vec::new();
        let mut start = self.offset();
        if compact {
            let first = self.attempt(|p| entry(p, indent.value));
            if !first.is_valid() {
                return (entries, start);
            }
            entries.push(first);
        }
        loop {
            let mut trial = indent;
            let mut at = self.offset();
            let next = self.attempt(|p| {
                if !p.s_indent(&mut trial) {
                    return Node::Invalid;
                }
                at = p.offset();
                entry(p, trial.value)
            });
            if !next.is_valid() {
                break;
            }
            if entries.is_empty() {
                start = at;
            }
            indent = trial;
            entries.push(next);
        }
        (entries, start)
    }

    /// `l+block-sequence(n)`
    fn l_block_sequence(&mut self, n: i32) -> Node {
        let (entries, start) =
            self.block_entries(Indentation::lower_bound(n + 1), false, Self::c_l_block_seq_entry);
        self.block_sequence(entries, start)
    }

    /// `ns-l-compact-sequence(n)`: `- - a`
    fn ns_l_compact_sequence(&mut self, n: i32) -> Node {
        let (entries, start) =
            self.block_entries(Indentation::strict(n), true, Self::c_l_block_seq_entry);
        self.block_sequence(entries, start)
    }

    fn block_sequence(&self, entries: Vec<Node>, start: usize) -> Node {
        if entries.is_empty() {
            return Node::Invalid;
        }
        Node::Sequence(Sequence {
            entries,
            style: CollectionStyle::Block,
            span: self.span_from(start),
        })
    }

    /// `c-l-block-seq-entry(n)`
    fn c_l_block_seq_entry(&mut self, n: i32) -> Node {
        if self.eat(TokenKind::SequenceEntry).is_none() {
            return Node::Invalid;
        }
        self.s_l_block_indented(n, Context::BlockIn)
    }

    /// `s-l+block-indented(n, c)`: the node after `-` or `?`.
    fn s_l_block_indented(&mut self, n: i32, c: Context) -> Node {
        self.attempt(Self::compact_collection)
            .or_else(|| self.attempt(|p| p.s_l_block_node(n, c)))
            .or_else(|| self.attempt(Self::e_node_comments))
    }

    /// A compact sequence or mapping on the line of its parent's indicator.
    ///
    /// Its indentation is the column where it starts.
    fn compact_collection(&mut self) -> Node {
        let spaces_only =
            self.at(TokenKind::Whitespace) && self.tok.origin.bytes().all(|b| b == b' ');
        if !spaces_only {
            return Node::Invalid;
        }
        self.bump();
        let Ok(column) = i32::try_from(self.tok.start.column) else {
            return Node::Invalid;
        };
        self.attempt(|p| p.ns_l_compact_sequence(column))
            .or_else(|| self.attempt(|p| p.ns_l_compact_mapping(column)))
    }

    /// `e-node s-l-comments`: an empty node ending the line.
    pub(super) fn e_node_comments(&mut self) -> Node {
        let at = self.last_end;
        if self.s_l_comments() {
            Node::Null(span(at, at))
        } else {
            Node::Invalid
        }
    }

    /// `l+block-mapping(n)`
    fn l_block_mapping(&mut self, n: i32) -> Node {
        let (entries, start) =
            self.block_entries(Indentation::lower_bound(n + 1), false, Self::ns_l_block_map_entry);
        self.block_mapping(entries, start)
    }

    /// `ns-l-compact-mapping(n)`: `- a: b`
    fn ns_l_compact_mapping(&mut self, n: i32) -> Node {
        let (entries, start) =
            self.block_entries(Indentation::strict(n), true, Self::ns_l_block_map_entry);
        self.block_mapping(entries, start)
    }

    fn block_mapping(&self, entries: Vec<Node>, start: usize) -> Node {
        let entries: Vec<MappingEntry> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Node::MappingEntry(entry) => Some(*entry),
                _ => None,
            })
            .collect();
        if entries.is_empty() {
            return Node::Invalid;
        }
        Node::Mapping(Mapping {
            entries,
            style: CollectionStyle::Block,
            span: self.span_from(start),
        })
    }

    /// `ns-l-block-map-entry(n)`
    fn ns_l_block_map_entry(&mut self, n: i32) -> Node {
        self.attempt(|p| p.c_l_block_map_explicit_entry(n))
            .or_else(|| self.attempt(|p| p.ns_l_block_map_implicit_entry(n)))
    }

    /// `c-l-block-map-explicit-entry(n)`: `? key` optionally followed by
    /// `: value` on a line of its own.
    fn c_l_block_map_explicit_entry(&mut self, n: i32) -> Node {
        let start = self.offset();
        if self.eat(TokenKind::MappingKey).is_none() {
            return Node::Invalid;
        }
        let key = self.s_l_block_indented(n, Context::BlockOut);
        if !key.is_valid() {
            return Node::Invalid;
        }
        let value = self
            .attempt(|p| p.l_block_map_explicit_value(n))
            .or_else(|| Node::Null(span(self.last_end, self.last_end)));
        self.mapping_entry(key, value, start)
    }

    /// `l-block-map-explicit-value(n)`
    fn l_block_map_explicit_value(&mut self, n: i32) -> Node {
        let mut indent = Indentation::strict(n);
        if !self.s_indent(&mut indent) || self.eat(TokenKind::MappingValue).is_none() {
            return Node::Invalid;
        }
        self.s_l_block_indented(n, Context::BlockOut)
    }

    /// `ns-l-block-map-implicit-entry(n)`: `key: value` with a one-line key,
    /// which may be empty.
    fn ns_l_block_map_implicit_entry(&mut self, n: i32) -> Node {
        let start = self.offset();
        let key = self
            .attempt(|p| p.ns_s_implicit_key(Context::BlockKey))
            .or_else(|| Node::Null(span(start, start)));
        if self.eat(TokenKind::MappingValue).is_none() {
            return Node::Invalid;
        }
        let value = self
            .attempt(|p| p.s_l_block_node(n, Context::BlockOut))
            .or_else(|| self.attempt(Self::e_node_comments));
        if !value.is_valid() {
            return Node::Invalid;
        }
        self.mapping_entry(key, value, start)
    }

    pub(super) fn mapping_entry(&self, key: Node, value: Node, start: usize) -> Node {
        Node::MappingEntry(Box::new(MappingEntry {
            key,
            value,
            span: self.span_from(start),
        }))
    }

    /// `c-l+literal(n)` and `c-l+folded(n)`, at the `|` or `>` indicator.
    fn c_l_block_scalar(&mut self, n: i32, style: ScalarStyle) -> Node {
        let start = self.offset();
        self.bump();
        let Some((indicator, chomping)) = self.c_b_block_header() else {
            return Node::Invalid;
        };
        // An explicit indicator counts from the parent node, which is at
        // column 0 or deeper even for a top-level scalar.
        let content_indent = indicator.map(|m| n.max(0) + m);
        let mut lines = self.scratch.take();
        self.l_block_scalar_lines(n, content_indent, &mut lines);
        let value = block_scalar_value(&lines, style, chomping);
        self.scratch.give(lines);
        let end = self.last_end;
        self.repeat(|p| p.l_trail_comment() || p.l_comment());
        Node::Text(Text {
            value,
            style,
            span: span(start, end),
        })
    }

    /// `c-b-block-header`: indentation indicator and chomping indicator in
    /// either order, then the end of the line.
    fn c_b_block_header(&mut self) -> Option<(Option<i32>, Chomping)> {
        let mut indicator = None;
        let mut chomping = None;
        for _ in 0..2 {
            let kind = self.tok.kind;
            match kind {
                TokenKind::Text if indicator.is_none() => {
                    indicator = Some(indentation_indicator(&self.tok.origin)?);
                }
                TokenKind::StripChomping if chomping.is_none() => chomping = Some(Chomping::Strip),
                TokenKind::KeepChomping if chomping.is_none() => chomping = Some(Chomping::Keep),
                _ => break,
            }
            self.bump();
        }
        self.s_b_comment()
            .then_some((indicator, chomping.unwrap_or(Chomping::Clip)))
    }

    /// Collect the lines of a block scalar body into `lines`, indentation
    /// removed. Without an explicit indentation the first non-blank line
    /// fixes it, and it must be deeper than `n`.
    fn l_block_scalar_lines(
        &mut self,
        n: i32,
        mut content_indent: Option<i32>,
        lines: &mut Vec<ScalarLine>,
    ) {
        loop {
            self.set_checkpoint();
            let Some(line) = self.read_line() else {
                self.rollback();
                return;
            };
            let spaces = line.text.bytes().take_while(|&b| b == b' ').count();
            let blank = line
                .text
                .get(spaces..)
                .unwrap_or_default()
                .chars()
                .all(|ch| ch == '\t');
            let spaces_i32 = i32::try_from(spaces).unwrap_or(i32::MAX);
            let indent = match content_indent {
                Some(indent) => Some(indent),
                None if blank => None,
                None if spaces_i32 > n => {
                    content_indent = Some(spaces_i32);
                    content_indent
                }
                None => {
                    self.rollback();
                    return;
                }
            };
            let indent = indent.and_then(|indent| usize::try_from(indent).ok());
            let text = match indent {
                // Whitespace beyond the indentation is content, even on a blank line.
                Some(indent) if spaces >= indent && (!blank || line.text.len() > indent) => {
                    line.text.get(indent..).unwrap_or_default().to_owned()
                }
                _ if blank => String::new(),
                _ => {
                    self.rollback();
                    return;
                }
            };
            self.commit();
            lines.push(ScalarLine {
                text,
                broken: line.broken,
            });
        }
    }

    /// One source line verbatim, with its line break consumed.
    fn read_line(&mut self) -> Option<ScalarLine> {
        if !self.start_of_line
            || matches!(
                self.tok.kind,
                TokenKind::Eof | TokenKind::DocumentStart | TokenKind::DocumentEnd
            )
        {
            return None;
        }
        let mut text = String::new();
        while !matches!(self.tok.kind, TokenKind::LineBreak | TokenKind::Eof) {
            text.push_str(&self.bump().origin);
        }
        let broken = self.eat(TokenKind::LineBreak).is_some();
        Some(ScalarLine { text, broken })
    }

    /// `l-trail-comments`: comment lines after a block scalar. A comment
    /// indented like the body was lexed as body text.
    fn l_trail_comment(&mut self) -> bool {
        if !self.start_of_line {
            return false;
        }
        self.eat(TokenKind::Whitespace);
        let comment = self.at(TokenKind::Comment)
            || (self.at(TokenKind::Text) && self.tok.origin.starts_with('#'));
        if !comment {
            return false;
        }
        while !matches!(self.tok.kind, TokenKind::LineBreak | TokenKind::Eof) {
            self.bump();
        }
        self.b_comment()
    }
}

/// A single digit from 1 to 9.
fn indentation_indicator(text: &str) -> Option<i32> {
    match text.as_bytes() {
        [digit @ b'1'..=b'9'] => Some(i32::from(digit - b'0')),
        _ => None,
    }
}

/// Content of a block scalar from its lines.
fn block_scalar_value(
    lines: &[ScalarLine],
    style: ScalarStyle,
    chomping: Chomping,
) -> String {
    let Some(last) = lines.iter().rposition(|line| !line.text.is_empty()) else {
        return match chomping {
            Chomping::Keep => "\n".repeat(lines.iter().filter(|line| line.broken).count()),
            Chomping::Strip | Chomping::Clip => String::new(),
        };
    };
    let (body, trailing) = lines.split_at(last + 1);
    let mut value = match style {
        ScalarStyle::Folded => fold_lines(body),
        _ => body
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    let broken = body.last().is_some_and(|line| line.broken);
    match chomping {
        Chomping::Strip => {}
        Chomping::Clip => {
            if broken {
                value.push('\n');
            }
        }
        Chomping::Keep => {
            if broken {
                value.push('\n');
            }
            for line in trailing {
                if line.broken {
                    value.push('\n');
                }
            }
        }
    }
    value
}

/// Folded style: line breaks between two regular lines become a space, or
/// one line feed per empty line between them. Breaks around more-indented
/// lines are kept.
fn fold_lines(lines: &[ScalarLine]) -> String {
    let mut value = String::new();
    let mut previous_spaced = None;
    let mut empty = 0;
    for line in lines {
        if line.text.is_empty() {
            empty += 1;
            continue;
        }
        let spaced = line.text.starts_with([' ', '\t']);
        match previous_spaced {
            None => value.push_str(&"\n".repeat(empty)),
            Some(false) if !spaced && empty == 0 => value.push(' '),
            Some(false) if !spaced => value.push_str(&"\n".repeat(empty)),
            Some(_) => value.push_str(&"\n".repeat(empty + 1)),
        }
        value.push_str(&line.text);
        previous_spaced = Some(spaced);
        empty = 0;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str], last_broken: bool) -> Vec<ScalarLine> {
        let count = texts.len();
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| ScalarLine {
                text: (*text).to_owned(),
                broken: index + 1 < count || last_broken,
            })
            .collect()
    }

    #[test]
    fn test_indentation_indicator() {
        assert_eq!(indentation_indicator("2"), Some(2));
        assert_eq!(indentation_indicator("9"), Some(9));
        assert_eq!(indentation_indicator("0"), None);
        assert_eq!(indentation_indicator("10"), None);
        assert_eq!(indentation_indicator("x"), None);
    }

    #[test]
    fn test_seq_spaces() {
        assert_eq!(seq_spaces(2, Context::BlockOut), 1);
        assert_eq!(seq_spaces(2, Context::BlockIn), 2);
    }

    #[test]
    fn test_literal_chomping() {
        let body = lines(&["a", "b", "", ""], true);
        assert_eq!(block_scalar_value(&body, ScalarStyle::Literal, Chomping::Strip), "a\nb");
        assert_eq!(block_scalar_value(&body, ScalarStyle::Literal, Chomping::Clip), "a\nb\n");
        assert_eq!(
            block_scalar_value(&body, ScalarStyle::Literal, Chomping::Keep),
            "a\nb\n\n\n"
        );
    }

    #[test]
    fn test_clip_without_final_break() {
        let body = lines(&["a"], false);
        assert_eq!(block_scalar_value(&body, ScalarStyle::Literal, Chomping::Clip), "a");
    }

    #[test]
    fn test_empty_body() {
        let body = lines(&["", ""], true);
        assert_eq!(block_scalar_value(&body, ScalarStyle::Literal, Chomping::Clip), "");
        assert_eq!(block_scalar_value(&body, ScalarStyle::Folded, Chomping::Keep), "\n\n");
    }

    #[test]
    fn test_folding() {
        let body = lines(&["a", "b", "", "c", "  d", "e"], true);
        assert_eq!(
            block_scalar_value(&body, ScalarStyle::Folded, Chomping::Clip),
            "a b\nc\n  d\ne\n"
        );
    }

    #[test]
    fn test_leading_empty_lines() {
        let body = lines(&["", "a"], true);
        assert_eq!(block_scalar_value(&body, ScalarStyle::Folded, Chomping::Strip), "\na");
        assert_eq!(block_scalar_value(&body, ScalarStyle::Literal, Chomping::Strip), "\na");
    }
}
