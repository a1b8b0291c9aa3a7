// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! End-to-end tests in event notation.
//!
//! The AST is flattened into the event lines used by the YAML test suite
//! (<https://github.com/yaml/yaml-test-suite>), which makes expected trees
//! short to write and easy to compare.

use yaml_ast::{parse, CollectionStyle, Node, Properties, ScalarStyle};

/// Flatten `node` into test suite events.
fn events(node: &Node, out: &mut Vec<String>) {
    match node {
        Node::Stream(stream) => {
            out.push("+STR".to_owned());
            for document in &stream.documents {
                events(document, out);
            }
            out.push("-STR".to_owned());
        }
        Node::Document(document) => {
            out.push(if document.explicit_start { "+DOC ---" } else { "+DOC" }.to_owned());
            events(&document.content, out);
            out.push(if document.explicit_end { "-DOC ..." } else { "-DOC" }.to_owned());
        }
        _ => node_events(node, None, out),
    }
}

fn node_events(node: &Node, properties: Option<&Properties>, out: &mut Vec<String>) {
    let props = format_properties(properties);
    match node {
        Node::Content(content) => node_events(&content.payload, Some(&content.properties), out),
        Node::Mapping(mapping) => {
            let flow = if mapping.style == CollectionStyle::Flow { " {}" } else { "" };
            out.push(format!("+MAP{flow}{props}"));
            for entry in &mapping.entries {
                node_events(&entry.key, None, out);
                node_events(&entry.value, None, out);
            }
            out.push("-MAP".to_owned());
        }
        Node::Sequence(sequence) => {
            let flow = if sequence.style == CollectionStyle::Flow { " []" } else { "" };
            out.push(format!("+SEQ{flow}{props}"));
            for entry in &sequence.entries {
                node_events(entry, None, out);
            }
            out.push("-SEQ".to_owned());
        }
        Node::Text(text) => {
            let style = match text.style {
                ScalarStyle::Plain => ':',
                ScalarStyle::SingleQuoted => '\'',
                ScalarStyle::DoubleQuoted => '"',
                ScalarStyle::Literal => '|',
                ScalarStyle::Folded => '>',
            };
            out.push(format!("=VAL{props} {style}{}", escape(&text.value)));
        }
        Node::Null(_) => out.push(format!("=VAL{props} :")),
        Node::Alias(alias) => out.push(format!("=ALI *{}", alias.name)),
        other => out.push(format!("?? {other:?}")),
    }
}

fn format_properties(properties: Option<&Properties>) -> String {
    let Some(properties) = properties else {
        return String::new();
    };
    let mut text = String::new();
    if let Some(anchor) = &properties.anchor {
        text.push_str(&format!(" &{}", anchor.name));
    }
    if let Some(tag) = &properties.tag {
        text.push_str(&format!(" <{}>", tag.resolved.as_deref().unwrap_or("!")));
    }
    text
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

/// Parse `input`, require a clean parse and compare the events.
fn check(input: &str, expected: &[&str]) {
    let (root, errors) = parse(input);
    assert!(errors.is_empty(), "errors for {input:?}: {errors:?}");
    let mut actual = Vec::new();
    events(&root, &mut actual);
    assert_eq!(actual, expected, "events for {input:?}");
}

#[test]
fn test_mapping_document() {
    check(
        "key: value",
        &["+STR", "+DOC", "+MAP", "=VAL :key", "=VAL :value", "-MAP", "-DOC", "-STR"],
    );
}

#[test]
fn test_sequence_document() {
    check(
        "- a\n- b",
        &["+STR", "+DOC", "+SEQ", "=VAL :a", "=VAL :b", "-SEQ", "-DOC", "-STR"],
    );
}

#[test]
fn test_anchor_alias_linkage() {
    check(
        "a: &x 1\nb: *x",
        &[
            "+STR",
            "+DOC",
            "+MAP",
            "=VAL :a",
            "=VAL &x :1",
            "=VAL :b",
            "=ALI *x",
            "-MAP",
            "-DOC",
            "-STR",
        ],
    );
}

#[test]
fn test_flow_sequence_document() {
    check(
        "[1, 2, 3]",
        &["+STR", "+DOC", "+SEQ []", "=VAL :1", "=VAL :2", "=VAL :3", "-SEQ", "-DOC", "-STR"],
    );
}

#[test]
fn test_explicit_documents() {
    check(
        "---\na\n...\n---\nb\n",
        &["+STR", "+DOC ---", "=VAL :a", "-DOC ...", "+DOC ---", "=VAL :b", "-DOC", "-STR"],
    );
}

#[test]
fn test_block_scalars() {
    check(
        "a: |\n  x\n  y\nb: >\n  folded\n  text\n",
        &[
            "+STR",
            "+DOC",
            "+MAP",
            "=VAL :a",
            "=VAL |x\\ny\\n",
            "=VAL :b",
            "=VAL >folded text\\n",
            "-MAP",
            "-DOC",
            "-STR",
        ],
    );
}

#[test]
fn test_tagged_scalar() {
    check(
        "!!int 3",
        &["+STR", "+DOC", "=VAL <tag:yaml.org,2002:int> :3", "-DOC", "-STR"],
    );
}

#[test]
fn test_flow_mappings_in_block_sequence() {
    check(
        "- {a: 1}\n- {b: [x, y]}\n",
        &[
            "+STR",
            "+DOC",
            "+SEQ",
            "+MAP {}",
            "=VAL :a",
            "=VAL :1",
            "-MAP",
            "+MAP {}",
            "=VAL :b",
            "+SEQ []",
            "=VAL :x",
            "=VAL :y",
            "-SEQ",
            "-MAP",
            "-SEQ",
            "-DOC",
            "-STR",
        ],
    );
}

#[test]
fn test_empty_value_and_comments() {
    check(
        "# header\na: # nothing\nb: 'q' # trailing\n",
        &[
            "+STR", "+DOC", "+MAP", "=VAL :a", "=VAL :", "=VAL :b", "=VAL 'q", "-MAP", "-DOC",
            "-STR",
        ],
    );
}

#[test]
fn test_empty_stream() {
    check("", &["+STR", "-STR"]);
}
