// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! AST node types.
//!
//! The tree keeps the structural details of the YAML data model: collection
//! and scalar styles, properties (tag and anchor) attached to content, aliases
//! and document boundaries. Every production returns either a valid node or
//! [`Node::Invalid`]; [`Node::is_valid`] is the only check callers need.
//!
//! Properties are not separate nodes in the tree: a node carrying a tag or an
//! anchor is wrapped in [`Node::Content`], so `&a key: value` yields a mapping
//! whose first key is `Content { properties: &a, payload: Text("key") }`.

use crate::span::Span;

/// A node of the YAML AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Stream(Stream),
    Document(Document),
    Mapping(Mapping),
    MappingEntry(Box<MappingEntry>),
    Sequence(Sequence),
    /// A node annotated with a tag and/or an anchor.
    Content(Box<Content>),
    Properties(Properties),
    Tag(Tag),
    Anchor(Anchor),
    Alias(Alias),
    Text(Text),
    /// An empty node.
    Null(Span),
    /// No parse.
    Invalid,
}

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NodeType {
    #[display("stream")]
    Stream,
    #[display("document")]
    Document,
    #[display("mapping")]
    Mapping,
    #[display("mapping entry")]
    MappingEntry,
    #[display("sequence")]
    Sequence,
    #[display("content")]
    Content,
    #[display("properties")]
    Properties,
    #[display("tag")]
    Tag,
    #[display("anchor")]
    Anchor,
    #[display("alias")]
    Alias,
    #[display("text")]
    Text,
    #[display("null")]
    Null,
    #[display("invalid")]
    Invalid,
}

/// Layout of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CollectionStyle {
    /// Indentation based
    #[display("block")]
    Block,
    /// Bracketed: `[...]` or `{...}`
    #[display("flow")]
    Flow,
}

/// How a scalar was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScalarStyle {
    #[display("plain")]
    Plain,
    #[display("single-quoted")]
    SingleQuoted,
    #[display("double-quoted")]
    DoubleQuoted,
    /// `|`
    #[display("literal")]
    Literal,
    /// `>`
    #[display("folded")]
    Folded,
}

/// The top-level container of zero or more documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// [`Node::Document`] nodes in source order.
    pub documents: Vec<Node>,
    pub span: Span,
}

/// A directive from a document prolog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `%YAML major.minor`
    Yaml { major: u32, minor: u32, span: Span },
    /// `%TAG handle prefix`
    Tag {
        handle: String,
        prefix: String,
        span: Span,
    },
    /// Any other `%NAME params...`; preserved, otherwise ignored.
    Reserved {
        name: String,
        params: Vec<String>,
        span: Span,
    },
}

/// One document of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The root node; [`Node::Null`] for an empty document.
    pub content: Box<Node>,
    pub directives: Vec<Directive>,
    /// The document was opened by `---`.
    pub explicit_start: bool,
    /// The document was closed by `...`.
    pub explicit_end: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub entries: Vec<MappingEntry>,
    pub style: CollectionStyle,
    pub span: Span,
}

/// A key/value pair; either side may be [`Node::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub key: Node,
    pub value: Node,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub entries: Vec<Node>,
    pub style: CollectionStyle,
    pub span: Span,
}

/// A node together with its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub properties: Properties,
    pub payload: Node,
    pub span: Span,
}

/// Tag and anchor attached to a node; at least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    pub tag: Option<Tag>,
    pub anchor: Option<Anchor>,
    pub span: Span,
}

/// A node tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The tag as written, e.g. `!!str`, `!local`, `!<tag:x>` or `!`.
    pub name: String,
    /// The full tag after handle resolution, when the handle is known.
    /// `None` for the non-specific tag `!` and for undeclared handles.
    pub resolved: Option<String>,
    pub span: Span,
}

/// `&name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub name: String,
    pub span: Span,
}

/// `*name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub span: Span,
}

/// A scalar's value after folding and escape processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub style: ScalarStyle,
    pub span: Span,
}

impl Node {
    /// Returns `false` only for [`Node::Invalid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Stream(_) => NodeType::Stream,
            Self::Document(_) => NodeType::Document,
            Self::Mapping(_) => NodeType::Mapping,
            Self::MappingEntry(_) => NodeType::MappingEntry,
            Self::Sequence(_) => NodeType::Sequence,
            Self::Content(_) => NodeType::Content,
            Self::Properties(_) => NodeType::Properties,
            Self::Tag(_) => NodeType::Tag,
            Self::Anchor(_) => NodeType::Anchor,
            Self::Alias(_) => NodeType::Alias,
            Self::Text(_) => NodeType::Text,
            Self::Null(_) => NodeType::Null,
            Self::Invalid => NodeType::Invalid,
        }
    }

    /// Source span; `None` for [`Node::Invalid`].
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        Some(match self {
            Self::Stream(node) => node.span,
            Self::Document(node) => node.span,
            Self::Mapping(node) => node.span,
            Self::MappingEntry(node) => node.span,
            Self::Sequence(node) => node.span,
            Self::Content(node) => node.span,
            Self::Properties(node) => node.span,
            Self::Tag(node) => node.span,
            Self::Anchor(node) => node.span,
            Self::Alias(node) => node.span,
            Self::Text(node) => node.span,
            Self::Null(span) => *span,
            Self::Invalid => return None,
        })
    }

    /// The node with any [`Node::Content`] wrapper removed.
    #[must_use]
    pub fn payload(&self) -> &Self {
        match self {
            Self::Content(content) => content.payload.payload(),
            node => node,
        }
    }

    /// Properties attached to this node, if it is wrapped in [`Node::Content`].
    #[must_use]
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Self::Content(content) => Some(&content.properties),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(document) => Some(document),
            _ => None,
        }
    }

    /// The mapping, looking through properties.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self.payload() {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// The sequence, looking through properties.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self.payload() {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// The scalar value, looking through properties.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.payload() {
            Self::Text(text) => Some(&text.value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match self.payload() {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_alias(&self) -> Option<&Alias> {
        match self.payload() {
            Self::Alias(alias) => Some(alias),
            _ => None,
        }
    }

    /// Returns `true` for an empty node, with or without properties.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.payload(), Self::Null(_))
    }

    /// The anchor name attached to this node, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.properties()
            .and_then(|properties| properties.anchor.as_ref())
            .map(|anchor| anchor.name.as_str())
    }

    /// The tag attached to this node, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        self.properties()
            .and_then(|properties| properties.tag.as_ref())
    }
}

impl Mapping {
    /// The value of the first entry whose key is the plain text `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|entry| entry.key.as_str() == Some(key))
            .map(|entry| &entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::span;

    fn text(value: &str) -> Node {
        Node::Text(Text {
            value: value.to_owned(),
            style: ScalarStyle::Plain,
            span: span(0, value.len()),
        })
    }

    #[test]
    fn test_validity_predicate() {
        assert!(!Node::Invalid.is_valid());
        assert!(Node::Null(span(0, 0)).is_valid());
        assert_eq!(Node::Invalid.node_type(), NodeType::Invalid);
        assert_eq!(Node::Invalid.span(), None);
        assert_eq!(NodeType::MappingEntry.to_string(), "mapping entry");
    }

    #[test]
    fn test_payload_looks_through_content() {
        let node = Node::Content(Box::new(Content {
            properties: Properties {
                tag: None,
                anchor: Some(Anchor {
                    name: "x".to_owned(),
                    span: span(0, 2),
                }),
                span: span(0, 2),
            },
            payload: text("1"),
            span: span(0, 4),
        }));
        assert_eq!(node.node_type(), NodeType::Content);
        assert_eq!(node.as_str(), Some("1"));
        assert_eq!(node.anchor(), Some("x"));
        assert!(node.tag().is_none());
        assert_eq!(node.span(), Some(span(0, 4)));
    }

    #[test]
    fn test_mapping_get() {
        let mapping = Mapping {
            entries: vec![MappingEntry {
                key: text("a"),
                value: text("b"),
                span: span(0, 4),
            }],
            style: CollectionStyle::Block,
            span: span(0, 4),
        };
        assert_eq!(mapping.get("a").and_then(Node::as_str), Some("b"));
        assert!(mapping.get("b").is_none());
    }
}
