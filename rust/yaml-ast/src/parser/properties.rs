// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Node properties (tags and anchors) and alias nodes.

use std::rc::Rc;

use crate::charset::CharSet;
use crate::error::ErrorKind;
use crate::node::{Alias, Anchor, Content, Node, Properties, Tag};
use crate::token::{Token, TokenKind};
use crate::token_source::TokenStream;

use super::{Context, Parser};

/// Prefix of the `!!` handle unless a `%TAG` directive overrides it.
const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

impl<T: TokenStream> Parser<T> {
    /// `c-ns-properties(n, c)`: a tag and/or an anchor, in either order.
    pub(super) fn c_ns_properties(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let kind = self.tok.kind;
        let (tag, anchor) = match kind {
            TokenKind::Tag => {
                let Some(tag) = self.c_ns_tag_property() else {
                    return Node::Invalid;
                };
                let anchor = self.attempt(|p| {
                    p.s_separate(n, c)
                        .then(|| p.c_ns_anchor_property())
                        .flatten()
                });
                (Some(tag), anchor)
            }
            TokenKind::Anchor => {
                let Some(anchor) = self.c_ns_anchor_property() else {
                    return Node::Invalid;
                };
                let tag = self.attempt(|p| {
                    p.s_separate(n, c)
                        .then(|| p.c_ns_tag_property())
                        .flatten()
                });
                (tag, Some(anchor))
            }
            _ => return Node::Invalid,
        };
        Node::Properties(Properties {
            tag,
            anchor,
            span: self.span_from(start),
        })
    }

    /// Attach `properties` to `payload`, if there are any.
    pub(super) fn with_properties(&self, properties: Node, payload: Node, start: usize) -> Node {
        match (properties, payload) {
            (_, Node::Invalid) => Node::Invalid,
            (Node::Properties(properties), payload) => Node::Content(Box::new(Content {
                properties,
                payload,
                span: self.span_from(start),
            })),
            (_, payload) => payload,
        }
    }

    /// `c-ns-anchor-property`: `&name`
    fn c_ns_anchor_property(&mut self) -> Option<Anchor> {
        let (name, span) = self.named(TokenKind::Anchor)?;
        Some(Anchor { name, span })
    }

    /// `c-ns-alias-node`: `*name`
    pub(super) fn c_ns_alias_node(&mut self) -> Node {
        match self.named(TokenKind::Alias) {
            Some((name, span)) => Node::Alias(Alias { name, span }),
            None => Node::Invalid,
        }
    }

    /// An anchor or alias indicator directly followed by its name.
    fn named(&mut self, indicator: TokenKind) -> Option<(String, crate::span::Span)> {
        let start = self.offset();
        self.eat(indicator)?;
        if !self.at(TokenKind::Text) || !self.tok.matches(CharSet::Anchor) {
            return None;
        }
        let name = self.bump().origin.clone();
        Some((name, self.span_from(start)))
    }

    /// `c-ns-tag-property`: verbatim, shorthand or non-specific.
    ///
    /// A tag that starts well but is not a valid tag is a fatal error.
    fn c_ns_tag_property(&mut self) -> Option<Tag> {
        let start = self.offset();
        self.eat(TokenKind::Tag)?;
        let kind = self.tok.kind;
        let (name, resolved) = match kind {
            TokenKind::VerbatimStart => self.c_verbatim_tag()?,
            TokenKind::Tag => {
                self.bump();
                let suffix = self.tag_suffix()?;
                let resolved = self.resolve_tag("!!", &suffix);
                (format!("!!{suffix}"), resolved)
            }
            TokenKind::Text => {
                let word = self.bump();
                if self.at(TokenKind::Tag) {
                    // `!handle!suffix`
                    if !word.matches(CharSet::Word) {
                        return self.malformed_tag(&word);
                    }
                    self.bump();
                    let suffix = self.tag_suffix()?;
                    let handle = format!("!{}!", word.origin);
                    let resolved = self.resolve_tag(&handle, &suffix);
                    (format!("{handle}{suffix}"), resolved)
                } else {
                    if !word.matches(CharSet::Tag) {
                        return self.malformed_tag(&word);
                    }
                    let resolved = self.resolve_tag("!", &word.origin);
                    (format!("!{}", word.origin), resolved)
                }
            }
            // The non-specific tag.
            _ => ("!".to_owned(), None),
        };
        if self.at(TokenKind::Text) {
            let stray = Rc::clone(&self.tok);
            return self.malformed_tag(&stray);
        }
        Some(Tag {
            name,
            resolved,
            span: self.span_from(start),
        })
    }

    /// `!<uri>`
    fn c_verbatim_tag(&mut self) -> Option<(String, Option<String>)> {
        self.bump();
        if !self.at(TokenKind::Text) || !self.tok.matches(CharSet::Uri) {
            let found = Rc::clone(&self.tok);
            return self.malformed_tag(&found);
        }
        let uri = self.bump().origin.clone();
        if self.eat(TokenKind::VerbatimEnd).is_none() {
            let found = Rc::clone(&self.tok);
            return self.malformed_tag(&found);
        }
        Some((format!("!<{uri}>"), Some(uri)))
    }

    /// The text after a tag handle.
    fn tag_suffix(&mut self) -> Option<String> {
        if !self.at(TokenKind::Text) || !self.tok.matches(CharSet::Tag) {
            let found = Rc::clone(&self.tok);
            return self.malformed_tag(&found);
        }
        Some(self.bump().origin.clone())
    }

    fn malformed_tag<R>(&mut self, found: &Token) -> Option<R> {
        self.fatal(ErrorKind::MalformedTag, found);
        None
    }

    /// Expand a shorthand tag through the handles of the current document.
    ///
    /// Undeclared named handles do not resolve.
    fn resolve_tag(&self, handle: &str, suffix: &str) -> Option<String> {
        let declared = self
            .tag_handles
            .iter()
            .rev()
            .find(|(declared, _)| declared == handle)
            .map(|(_, prefix)| prefix.as_str());
        let prefix = declared.or(match handle {
            "!" => Some("!"),
            "!!" => Some(CORE_SCHEMA_PREFIX),
            _ => None,
        })?;
        Some(format!("{prefix}{}", percent_decode(suffix)))
    }
}

/// Decode `%XX` escapes; invalid UTF-8 decodes to `U+FFFD`.
fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while let Some(&byte) = bytes.get(index) {
        let escaped = (byte == b'%')
            .then(|| bytes.get(index + 1..index + 3))
            .flatten()
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(value) => {
                decoded.push(value);
                index += 3;
            }
            None => {
                decoded.push(byte);
                index += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("%C3%A9"), "é");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
