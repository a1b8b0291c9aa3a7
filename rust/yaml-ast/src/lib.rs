// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! A YAML 1.2 parser producing a structural AST.
//!
//! This crate provides a YAML parser that:
//! - Tokenizes with a context-sensitive tokenizer that never drops input
//! - Follows the YAML 1.2 grammar by recursive descent with backtracking
//! - Keeps styles, tags, anchors, aliases and document markers in the tree
//! - Reports unbalanced brackets, malformed tags and dead ends as errors
//!
//! Nothing is resolved against a schema: scalars stay text and aliases stay
//! references.
//!
//! # Example
//!
//! ```
//! use yaml_ast::{parse, Node};
//!
//! let (stream, errors) = parse("name: John\nage: 30\n");
//! assert!(errors.is_empty());
//!
//! let stream = stream.as_stream().unwrap();
//! let Node::Document(document) = &stream.documents[0] else {
//!     panic!("expected a document");
//! };
//! let mapping = document.content.as_mapping().unwrap();
//! assert_eq!(mapping.get("name").and_then(Node::as_str), Some("John"));
//! ```

mod balance;
mod charset;
mod checkpoint;
mod context;
mod dead_end;
mod error;
mod node;
mod options;
mod parser;
mod runes;
mod span;
mod token;
mod token_source;
mod tokenizer;

pub use balance::{BalanceChecker, OpenPair};
pub use charset::CharSet;
pub use checkpoint::{Checkpointed, Pull};
pub use context::{ContextStack, LexContext};
pub use dead_end::{DeadEndFinder, DEFAULT_THRESHOLD};
pub use error::{ErrorKind, ParseError};
pub use node::{
    Alias, Anchor, CollectionStyle, Content, Directive, Document, Mapping, MappingEntry, Node,
    NodeType, Properties, ScalarStyle, Sequence, Stream, Tag, Text,
};
pub use options::ParseOptions;
pub use runes::{Rune, Runes};
pub use span::{Position, Span};
pub use token::{Token, TokenKind};
pub use token_source::{TokenList, TokenSource, TokenStream, TokenStreamConstructor};
pub use tokenizer::Tokenizer;

use parser::Parser;

/// Parse YAML text into a [`Node::Stream`] and the errors encountered.
///
/// Parsing never fails outright: the returned tree holds whatever parsed,
/// and every problem found along the way is in the error list.
pub fn parse(input: &str) -> (Node, Vec<ParseError>) {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse YAML from bytes. Invalid UTF-8 decodes to `U+FFFD`.
pub fn parse_bytes(input: &[u8]) -> (Node, Vec<ParseError>) {
    parse_bytes_with_options(input, &ParseOptions::default())
}

/// Parse YAML text with the given options.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> (Node, Vec<ParseError>) {
    parse_bytes_with_options(input.as_bytes(), options)
}

/// Parse YAML bytes with the given options.
///
/// The [`ParseOptions::token_stream`] constructor, when set, replaces the
/// built-in [`Tokenizer`].
pub fn parse_bytes_with_options(input: &[u8], options: &ParseOptions) -> (Node, Vec<ParseError>) {
    match options.token_stream {
        Some(constructor) => parse_token_stream(constructor(input), options),
        None => parse_token_stream(Tokenizer::from_bytes(input), options),
    }
}

/// Parse an already tokenized input.
pub fn parse_token_stream<T: TokenStream>(
    stream: T,
    options: &ParseOptions,
) -> (Node, Vec<ParseError>) {
    Parser::new(stream, options).parse()
}
