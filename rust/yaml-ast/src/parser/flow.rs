// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Flow collections (`[...]`, `{...}`), flow pairs and flow nodes.

use crate::node::{CollectionStyle, Mapping, Node, Sequence};
use crate::span::span;
use crate::token::TokenKind;
use crate::token_source::TokenStream;

use super::{Context, Parser};

/// Signature shared by the flow entry productions.
type FlowEntry<P> = fn(&mut P, i32, Context) -> Node;

impl<T: TokenStream> Parser<T> {
    /// `ns-flow-node(n, c)`: alias, content, or properties with optional content.
    pub(super) fn ns_flow_node(&mut self, n: i32, c: Context) -> Node {
        self.attempt(Self::c_ns_alias_node)
            .or_else(|| self.attempt(|p| p.ns_flow_content(n, c)))
            .or_else(|| self.attempt(|p| p.properties_then(n, c, Self::ns_flow_content)))
    }

    /// `ns-flow-yaml-node(n, c)`: like [`Self::ns_flow_node`] with plain
    /// content only.
    fn ns_flow_yaml_node(&mut self, n: i32, c: Context) -> Node {
        self.attempt(Self::c_ns_alias_node)
            .or_else(|| self.attempt(|p| p.ns_plain(n, c)))
            .or_else(|| self.attempt(|p| p.properties_then(n, c, Self::ns_plain)))
    }

    /// Properties followed by separated `content`, or by an empty scalar.
    fn properties_then(&mut self, n: i32, c: Context, content: FlowEntry<Self>) -> Node {
        let start = self.offset();
        let properties = self.c_ns_properties(n, c);
        if !properties.is_valid() {
            return Node::Invalid;
        }
        let payload = self
            .attempt(|p| {
                if p.s_separate(n, c) {
                    content(p, n, c)
                } else {
                    Node::Invalid
                }
            })
            .or_else(|| Node::Null(span(self.last_end, self.last_end)));
        self.with_properties(properties, payload, start)
    }

    /// `ns-flow-content(n, c)`
    fn ns_flow_content(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.ns_plain(n, c))
            .or_else(|| self.c_flow_json_content(n, c))
    }

    /// `c-flow-json-content(n, c)`: the styles with explicit delimiters.
    fn c_flow_json_content(&mut self, n: i32, c: Context) -> Node {
        let kind = self.tok.kind;
        match kind {
            TokenKind::SequenceStart => self.attempt(|p| p.c_flow_sequence(n, c)),
            TokenKind::MappingStart => self.attempt(|p| p.c_flow_mapping(n, c)),
            TokenKind::SingleQuoteStart => self.attempt(|p| p.c_single_quoted(n, c)),
            TokenKind::DoubleQuoteStart => self.attempt(|p| p.c_double_quoted(n, c)),
            _ => Node::Invalid,
        }
    }

    /// `c-flow-json-node(n, c)`
    fn c_flow_json_node(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let properties = self.attempt(|p| {
            let properties = p.c_ns_properties(n, c);
            if properties.is_valid() && p.s_separate(n, c) {
                properties
            } else {
                Node::Invalid
            }
        });
        let content = self.c_flow_json_content(n, c);
        self.with_properties(properties, content, start)
    }

    /// `ns-s-block-map-implicit-key` and the implicit keys of flow pairs:
    /// a JSON-like key or a plain one, on a single line.
    pub(super) fn ns_s_implicit_key(&mut self, c: Context) -> Node {
        self.attempt(|p| p.c_s_implicit_json_key(c))
            .or_else(|| self.attempt(|p| p.ns_s_implicit_yaml_key(c)))
    }

    /// `c-s-implicit-json-key(c)`
    fn c_s_implicit_json_key(&mut self, c: Context) -> Node {
        if !self.json_key_ahead() {
            return Node::Invalid;
        }
        let key = self.c_flow_json_node(0, c);
        if key.is_valid() {
            self.eat(TokenKind::Whitespace);
        }
        key
    }

    /// Whether `:` follows the bracketed or quoted node at the cursor,
    /// after any properties.
    ///
    /// A nested collection that turns out not to be a key is then parsed
    /// once, as a node, instead of once per enclosing level.
    fn json_key_ahead(&mut self) -> bool {
        self.lookahead(|p| {
            while matches!(
                p.tok.kind,
                TokenKind::Tag
                    | TokenKind::VerbatimStart
                    | TokenKind::VerbatimEnd
                    | TokenKind::Anchor
                    | TokenKind::Text
                    | TokenKind::Whitespace
            ) {
                p.skip();
            }
            if p.tok.kind.closer().is_none() {
                return false;
            }
            let mut depth = 0_usize;
            loop {
                let kind = p.tok.kind;
                if kind == TokenKind::Eof {
                    return false;
                }
                if kind.closer().is_some() {
                    depth += 1;
                } else if kind.is_closer() {
                    depth = depth.saturating_sub(1);
                }
                p.skip();
                if depth == 0 {
                    break;
                }
            }
            if p.at(TokenKind::Whitespace) {
                p.skip();
            }
            p.at(TokenKind::MappingValue)
        })
    }

    /// `ns-s-implicit-yaml-key(c)`
    fn ns_s_implicit_yaml_key(&mut self, c: Context) -> Node {
        let key = self.ns_flow_yaml_node(0, c);
        if key.is_valid() {
            self.eat(TokenKind::Whitespace);
        }
        key
    }

    /// Entries separated by `,`; a trailing `,` is allowed.
    fn flow_entries(&mut self, n: i32, c: Context, entry: FlowEntry<Self>) -> Vec<Node> {
        let mut entries = Vec::new();
        loop {
            let node = self.attempt(|p| entry(p, n, c));
            if !node.is_valid() {
                break;
            }
            entries.push(node);
            self.s_separate_opt(n, c);
            if self.eat(TokenKind::CollectEntry).is_none() {
                break;
            }
            self.s_separate_opt(n, c);
        }
        entries
    }

    /// `c-flow-sequence(n, c)`
    ///
    /// Attempts are counted at the opener as well as in plain scalars, so a
    /// token stream that stops advancing ends in a dead end.
    fn c_flow_sequence(&mut self, n: i32, c: Context) -> Node {
        if !self.at(TokenKind::SequenceStart) || self.dead_end() {
            return Node::Invalid;
        }
        let start = self.offset();
        self.bump();
        self.s_separate_opt(n, c);
        let entries = self.flow_entries(n, c.inside_flow(), Self::ns_flow_seq_entry);
        if self.eat(TokenKind::SequenceEnd).is_none() {
            return Node::Invalid;
        }
        Node::Sequence(Sequence {
            entries,
            style: CollectionStyle::Flow,
            span: self.span_from(start),
        })
    }

    /// `ns-flow-seq-entry(n, c)`: a single-pair mapping or a node.
    fn ns_flow_seq_entry(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.ns_flow_pair(n, c))
            .or_else(|| self.attempt(|p| p.ns_flow_node(n, c)))
    }

    /// `c-flow-mapping(n, c)`
    fn c_flow_mapping(&mut self, n: i32, c: Context) -> Node {
        if !self.at(TokenKind::MappingStart) || self.dead_end() {
            return Node::Invalid;
        }
        let start = self.offset();
        self.bump();
        self.s_separate_opt(n, c);
        let entries = self
            .flow_entries(n, c.inside_flow(), Self::ns_flow_map_entry)
            .into_iter()
            .filter_map(|entry| match entry {
                Node::MappingEntry(entry) => Some(*entry),
                _ => None,
            })
            .collect();
        if self.eat(TokenKind::MappingEnd).is_none() {
            return Node::Invalid;
        }
        Node::Mapping(Mapping {
            entries,
            style: CollectionStyle::Flow,
            span: self.span_from(start),
        })
    }

    /// `ns-flow-map-entry(n, c)`
    fn ns_flow_map_entry(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.explicit_flow_entry(n, c))
            .or_else(|| self.attempt(|p| p.ns_flow_map_implicit_entry(n, c)))
    }

    /// `? ` followed by `ns-flow-map-explicit-entry(n, c)`.
    fn explicit_flow_entry(&mut self, n: i32, c: Context) -> Node {
        if self.eat(TokenKind::MappingKey).is_none() || !self.s_separate(n, c) {
            return Node::Invalid;
        }
        let start = self.offset();
        self.attempt(|p| p.ns_flow_map_implicit_entry(n, c))
            .or_else(|| {
                let empty = Node::Null(span(start, start));
                self.mapping_entry(empty.clone(), empty, start)
            })
    }

    /// `ns-flow-map-implicit-entry(n, c)`
    fn ns_flow_map_implicit_entry(&mut self, n: i32, c: Context) -> Node {
        self.attempt(|p| p.ns_flow_map_yaml_key_entry(n, c))
            .or_else(|| self.attempt(|p| p.c_ns_flow_map_empty_key_entry(n, c)))
            .or_else(|| self.attempt(|p| p.c_ns_flow_map_json_key_entry(n, c)))
    }

    /// `ns-flow-map-yaml-key-entry(n, c)`: the value may be omitted.
    fn ns_flow_map_yaml_key_entry(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let key = self.ns_flow_yaml_node(n, c);
        if !key.is_valid() {
            return Node::Invalid;
        }
        let value = self
            .attempt(|p| {
                p.s_separate_opt(n, c);
                p.c_ns_flow_map_separate_value(n, c)
            })
            .or_else(|| Node::Null(span(self.last_end, self.last_end)));
        self.mapping_entry(key, value, start)
    }

    /// `c-ns-flow-map-empty-key-entry(n, c)`: `: value`
    fn c_ns_flow_map_empty_key_entry(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let value = self.c_ns_flow_map_separate_value(n, c);
        if !value.is_valid() {
            return Node::Invalid;
        }
        self.mapping_entry(Node::Null(span(start, start)), value, start)
    }

    /// `c-ns-flow-map-json-key-entry(n, c)`: the value may be omitted.
    fn c_ns_flow_map_json_key_entry(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let key = self.c_flow_json_node(n, c);
        if !key.is_valid() {
            return Node::Invalid;
        }
        let value = self
            .attempt(|p| {
                p.s_separate_opt(n, c);
                p.c_ns_flow_map_adjacent_value(n, c)
            })
            .or_else(|| Node::Null(span(self.last_end, self.last_end)));
        self.mapping_entry(key, value, start)
    }

    /// `c-ns-flow-map-separate-value(n, c)`: `:` and a separated node, or
    /// nothing.
    fn c_ns_flow_map_separate_value(&mut self, n: i32, c: Context) -> Node {
        if self.eat(TokenKind::MappingValue).is_none() {
            return Node::Invalid;
        }
        self.attempt(|p| {
            if p.s_separate(n, c) {
                p.ns_flow_node(n, c)
            } else {
                Node::Invalid
            }
        })
        .or_else(|| Node::Null(span(self.last_end, self.last_end)))
    }

    /// `c-ns-flow-map-adjacent-value(n, c)`: after a JSON-like key the node
    /// may follow `:` directly.
    fn c_ns_flow_map_adjacent_value(&mut self, n: i32, c: Context) -> Node {
        if self.eat(TokenKind::MappingValue).is_none() {
            return Node::Invalid;
        }
        self.attempt(|p| {
            p.s_separate_opt(n, c);
            p.ns_flow_node(n, c)
        })
        .or_else(|| Node::Null(span(self.last_end, self.last_end)))
    }

    /// `ns-flow-pair(n, c)`: a `key: value` entry of a flow sequence,
    /// represented as a mapping with a single entry.
    fn ns_flow_pair(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let entry = self
            .attempt(|p| p.explicit_flow_entry(n, c))
            .or_else(|| self.attempt(|p| p.ns_flow_pair_yaml_key_entry(n, c)))
            .or_else(|| self.attempt(|p| p.c_ns_flow_map_empty_key_entry(n, c)))
            .or_else(|| self.attempt(|p| p.c_ns_flow_pair_json_key_entry(n, c)));
        let Node::MappingEntry(entry) = entry else {
            return Node::Invalid;
        };
        Node::Mapping(Mapping {
            entries: vec![*entry],
            style: CollectionStyle::Flow,
            span: self.span_from(start),
        })
    }

    /// `ns-flow-pair-yaml-key-entry(n, c)`
    fn ns_flow_pair_yaml_key_entry(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let key = self.ns_s_implicit_yaml_key(Context::FlowKey);
        if !key.is_valid() {
            return Node::Invalid;
        }
        let value = self.c_ns_flow_map_separate_value(n, c);
        self.pair(key, value, start)
    }

    /// `c-ns-flow-pair-json-key-entry(n, c)`
    fn c_ns_flow_pair_json_key_entry(&mut self, n: i32, c: Context) -> Node {
        let start = self.offset();
        let key = self.c_s_implicit_json_key(Context::FlowKey);
        if !key.is_valid() {
            return Node::Invalid;
        }
        let value = self.c_ns_flow_map_adjacent_value(n, c);
        self.pair(key, value, start)
    }

    fn pair(&self, key: Node, value: Node, start: usize) -> Node {
        if !value.is_valid() {
            return Node::Invalid;
        }
        self.mapping_entry(key, value, start)
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{CollectionStyle, Node};
    use crate::options::ParseOptions;

    fn root(input: &str) -> Node {
        let options = ParseOptions::new().with_omit_stream_wrapper(true);
        let (node, errors) = crate::parse_with_options(input, &options);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        match node {
            Node::Document(document) => *document.content,
            other => panic!("expected a document, got {other:?}"),
        }
    }

    #[test]
    fn test_flow_sequence_entries() {
        let node = root("[a, 'b', \"c\", [d], {e: f},]");
        let sequence = node.as_sequence().expect("sequence");
        assert_eq!(sequence.style, CollectionStyle::Flow);
        assert_eq!(sequence.entries.len(), 5);
        assert_eq!(sequence.entries.get(1).unwrap().as_str(), Some("b"));
        assert_eq!(sequence.entries.get(2).unwrap().as_str(), Some("c"));
        assert!(sequence.entries.get(3).unwrap().as_sequence().is_some());
        let mapping = sequence.entries.get(4).unwrap().as_mapping();
        assert_eq!(
            mapping.and_then(|m| m.get("e")).and_then(Node::as_str),
            Some("f")
        );
    }

    #[test]
    fn test_flow_pair_in_sequence() {
        let node = root("[a: b, c]");
        let sequence = node.as_sequence().expect("sequence");
        assert_eq!(sequence.entries.len(), 2);
        let pair = sequence.entries.first().unwrap();
        let pair = pair.as_mapping().expect("single-pair mapping");
        assert_eq!(pair.entries.len(), 1);
        assert_eq!(pair.get("a").and_then(Node::as_str), Some("b"));
        assert_eq!(sequence.entries.get(1).unwrap().as_str(), Some("c"));
    }

    #[test]
    fn test_flow_mapping_forms() {
        let node = root("{a: 1, b, \"c\":2, : d, ? e}");
        let mapping = node.as_mapping().expect("mapping");
        assert_eq!(mapping.style, CollectionStyle::Flow);
        assert_eq!(mapping.entries.len(), 5);
        assert_eq!(mapping.get("a").and_then(Node::as_str), Some("1"));
        assert!(mapping.get("b").is_some_and(Node::is_null));
        assert_eq!(mapping.get("c").and_then(Node::as_str), Some("2"));
        assert!(mapping.entries.get(3).unwrap().key.is_null());
        assert_eq!(mapping.entries.get(3).unwrap().value.as_str(), Some("d"));
        assert!(mapping.get("e").is_some_and(Node::is_null));
    }

    #[test]
    fn test_explicit_empty_pair() {
        let node = root("[ ? ]");
        let sequence = node.as_sequence().expect("sequence");
        let pair = sequence.entries.first().unwrap().as_mapping().expect("mapping");
        assert!(pair.entries.first().unwrap().key.is_null());
        assert!(pair.entries.first().unwrap().value.is_null());
    }

    #[test]
    fn test_multi_line_flow() {
        let node = root("key: [a,\n  b]\n");
        let mapping = node.as_mapping().expect("mapping");
        let sequence = mapping.get("key").and_then(Node::as_sequence).expect("sequence");
        assert_eq!(sequence.entries.len(), 2);
    }

    /// The single entry of a flow sequence.
    fn only_entry(node: &Node) -> &Node {
        let sequence = node.as_sequence().expect("sequence");
        assert_eq!(sequence.entries.len(), 1);
        sequence.entries.first().unwrap()
    }

    #[test]
    fn test_deep_nesting_in_block_value() {
        let depth = 24;
        let input = format!("key: {}a{}\nnext: b\n", "[".repeat(depth), "]".repeat(depth));
        let node = root(&input);
        let mapping = node.as_mapping().expect("mapping");
        assert_eq!(mapping.get("next").and_then(Node::as_str), Some("b"));
        let mut inner = mapping.get("key").expect("value");
        for _ in 0..depth {
            inner = only_entry(inner);
        }
        assert_eq!(inner.as_str(), Some("a"));
    }

    #[test]
    fn test_deep_nesting_with_properties() {
        let depth = 20;
        let input = format!("{}a{}", "[&x ".repeat(depth), "]".repeat(depth));
        let node = root(&input);
        let first = only_entry(&node);
        assert_eq!(first.anchor(), Some("x"));
        assert!(first.as_sequence().is_some());
    }

    #[test]
    fn test_mappings_nested_in_sequences() {
        let node = root("[{a: [{b: [c]}]}]");
        let outer = only_entry(&node).as_mapping().expect("mapping");
        let inner = only_entry(outer.get("a").expect("a"));
        let leaf = inner.as_mapping().and_then(|m| m.get("b")).expect("b");
        assert_eq!(only_entry(leaf).as_str(), Some("c"));
    }
}
