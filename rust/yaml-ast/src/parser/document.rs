// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Streams, documents and directives.

use std::rc::Rc;

use log::debug;

use crate::error::{ErrorKind, ParseError};
use crate::node::{Directive, Document, Node, Stream};
use crate::span::{span, Span};
use crate::token::{Token, TokenKind};
use crate::token_source::TokenStream;

use super::{Context, Parser};

impl<T: TokenStream> Parser<T> {
    /// `l-yaml-stream`
    ///
    /// Documents are separated by `...` or opened by `---`. Input that no
    /// document production accepts is skipped up to the next document marker
    /// and reported as [`ErrorKind::UnexpectedToken`].
    pub(super) fn l_yaml_stream(&mut self) -> Node {
        let start = self.offset();
        let mut documents = Vec::new();
        // A bare or directive document may only start the stream or follow `...`.
        let mut open_ended = true;
        loop {
            self.l_document_prefix();
            if self.at(TokenKind::Eof) {
                break;
            }
            let document = if open_ended {
                self.l_any_document()
            } else {
                self.attempt(|p| p.l_explicit_document(Vec::new()))
            };
            let parsed = document.is_valid();
            if parsed {
                debug!("document {} ends at {}", documents.len(), self.tok.start);
                documents.push(document);
            } else {
                self.skip_to_document_boundary();
            }
            let suffixes = self.repeat(Self::l_document_suffix);
            if parsed && suffixes > 0 {
                if let Some(Node::Document(document)) = documents.last_mut() {
                    document.explicit_end = true;
                    document.span = self.span_from(document.span.start);
                }
            }
            open_ended = suffixes > 0 || !parsed;
        }
        Node::Stream(Stream {
            documents,
            span: self.span_from(start),
        })
    }

    /// `l-document-prefix`: byte order mark and comment lines.
    fn l_document_prefix(&mut self) {
        self.eat(TokenKind::Bom);
        self.repeat(Self::l_comment);
    }

    /// `l-document-suffix`: `...` and trailing comments.
    fn l_document_suffix(&mut self) -> bool {
        self.start_of_line && self.eat(TokenKind::DocumentEnd).is_some() && self.s_l_comments()
    }

    /// `l-any-document`
    fn l_any_document(&mut self) -> Node {
        self.attempt(Self::l_directive_document)
            .or_else(|| self.attempt(|p| p.l_explicit_document(Vec::new())))
            .or_else(|| self.attempt(Self::l_bare_document))
    }

    /// `l-directive-document`: directives followed by an explicit document.
    fn l_directive_document(&mut self) -> Node {
        let start = self.offset();
        let mut directives = Vec::new();
        while let Some(directive) = self.attempt(Self::l_directive) {
            directives.push(directive);
        }
        if directives.is_empty() {
            return Node::Invalid;
        }
        self.check_yaml_directives(&directives);
        match self.l_explicit_document(directives) {
            Node::Document(mut document) => {
                document.span = self.span_from(start);
                Node::Document(document)
            }
            _ => Node::Invalid,
        }
    }

    /// `l-explicit-document`: `---` followed by a bare document or nothing.
    fn l_explicit_document(&mut self, directives: Vec<Directive>) -> Node {
        let start = self.offset();
        if !self.start_of_line || self.eat(TokenKind::DocumentStart).is_none() {
            return Node::Invalid;
        }
        self.begin_document(&directives);
        let content = self
            .attempt(|p| p.s_l_block_node(-1, Context::BlockIn))
            .or_else(|| {
                self.attempt(|p| {
                    let at = p.last_end;
                    if p.s_l_comments() {
                        Node::Null(span(at, at))
                    } else {
                        Node::Invalid
                    }
                })
            });
        if !content.is_valid() {
            return Node::Invalid;
        }
        Node::Document(Document {
            content: Box::new(content),
            directives,
            explicit_start: true,
            explicit_end: false,
            span: self.span_from(start),
        })
    }

    /// `l-bare-document`: a block node without markers.
    fn l_bare_document(&mut self) -> Node {
        let start = self.offset();
        self.begin_document(&[]);
        let content = self.s_l_block_node(-1, Context::BlockIn);
        if !content.is_valid() {
            return Node::Invalid;
        }
        Node::Document(Document {
            content: Box::new(content),
            directives: Vec::new(),
            explicit_start: false,
            explicit_end: false,
            span: self.span_from(start),
        })
    }

    /// Install the tag handles declared for the next document.
    fn begin_document(&mut self, directives: &[Directive]) {
        self.tag_handles.clear();
        for directive in directives {
            if let Directive::Tag { handle, prefix, .. } = directive {
                self.tag_handles.push((handle.clone(), prefix.clone()));
            }
        }
    }

    /// Skip input after a failed document, up to the next marker line.
    fn skip_to_document_boundary(&mut self) {
        let unexpected = Rc::clone(&self.tok);
        self.error(ErrorKind::UnexpectedToken, &unexpected);
        self.bump();
        while !self.at(TokenKind::Eof)
            && !(self.start_of_line
                && matches!(
                    self.tok.kind,
                    TokenKind::DocumentStart | TokenKind::DocumentEnd | TokenKind::Directive
                ))
        {
            self.bump();
        }
        debug!("resuming after unexpected input at {}", self.tok.start);
    }

    /// `l-directive`: `%` and the rest of its line, read in raw mode.
    fn l_directive(&mut self) -> Option<Directive> {
        if !self.start_of_line || !self.at(TokenKind::Directive) {
            return None;
        }
        let start = self.offset();
        let marker = Rc::clone(&self.tok);
        // The line is read verbatim: `!` and `#` are plain characters here.
        self.tokens.enter_raw();
        self.bump();
        let mut line = String::new();
        while !matches!(self.tok.kind, TokenKind::LineBreak | TokenKind::Eof) {
            line.push_str(&self.bump().origin);
        }
        self.tokens.exit_raw();
        let directive = self.directive(&line, self.span_from(start), &marker);
        self.s_l_comments().then_some(directive)
    }

    /// Interpret the text of a directive line.
    fn directive(&mut self, line: &str, span: Span, marker: &Token) -> Directive {
        let mut words = line
            .split_whitespace()
            .take_while(|word| !word.starts_with('#'));
        let name = words.next().unwrap_or_default().to_owned();
        let params: Vec<String> = words.map(str::to_owned).collect();
        let parsed = match (name.as_str(), params.as_slice()) {
            ("YAML", [version]) => parse_version(version)
                .map(|(major, minor)| Directive::Yaml { major, minor, span }),
            ("TAG", [handle, prefix]) if is_tag_handle(handle) => Some(Directive::Tag {
                handle: handle.clone(),
                prefix: prefix.clone(),
                span,
            }),
            ("YAML" | "TAG" | "", _) => None,
            _ => {
                debug!("ignoring reserved directive %{name}");
                Some(Directive::Reserved {
                    name: name.clone(),
                    params: params.clone(),
                    span,
                })
            }
        };
        parsed.unwrap_or_else(|| {
            self.push_error(
                ParseError::new(ErrorKind::InvalidDirective(name.clone()), span, marker.start)
                    .with_found(format!("%{}", line.trim_end())),
            );
            Directive::Reserved { name, params, span }
        })
    }

    /// At most one `%YAML` directive per document.
    fn check_yaml_directives(&mut self, directives: &[Directive]) {
        let mut versions = directives
            .iter()
            .filter(|directive| matches!(directive, Directive::Yaml { .. }));
        if let (Some(_), Some(Directive::Yaml { span, .. })) = (versions.next(), versions.next()) {
            let at = self.tok.start;
            self.push_error(
                ParseError::new(ErrorKind::InvalidDirective("YAML".to_owned()), *span, at)
                    .with_found("a second %YAML directive".to_owned()),
            );
        }
    }
}

/// `major.minor` with decimal components.
fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.')?;
    let decimal = |part: &str| {
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        part.parse::<u32>().ok()
    };
    Some((decimal(major)?, decimal(minor)?))
}

/// `!`, `!!` or `!word!`.
fn is_tag_handle(handle: &str) -> bool {
    match handle.strip_prefix('!') {
        Some("" | "!") => true,
        Some(rest) => rest
            .strip_suffix('!')
            .is_some_and(|word| word.chars().all(crate::charset::is_word_char)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2"), Some((1, 2)));
        assert_eq!(parse_version("1.10"), Some((1, 10)));
        assert_eq!(parse_version("1"), None);
        assert_eq!(parse_version("1.x"), None);
        assert_eq!(parse_version(".2"), None);
    }

    #[test]
    fn test_tag_handles() {
        assert!(is_tag_handle("!"));
        assert!(is_tag_handle("!!"));
        assert!(is_tag_handle("!e-x!"));
        assert!(!is_tag_handle("!e"));
        assert!(!is_tag_handle("e!"));
        assert!(!is_tag_handle("!a b!"));
    }
}
