// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Character-set predicates from the YAML 1.2 grammar.
//!
//! Each [`CharSet`] answers "does every character of this text belong to the
//! set". Tokens memoize the answers (see [`crate::token::Token::matches`]).

/// The character sets the parser queries token text against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CharSet {
    /// `ns-dec-digit+`
    #[display("decimal")]
    Decimal,
    /// `ns-word-char+`
    #[display("word")]
    Word,
    /// `ns-uri-char+`
    #[display("uri")]
    Uri,
    /// `ns-tag-char+`
    #[display("tag")]
    Tag,
    /// `ns-anchor-char+`
    #[display("anchor")]
    Anchor,
    /// `ns-plain-safe(flow-in)+`
    #[display("plain-safe")]
    PlainSafe,
    /// `nb-single-char*` with `''` pairs
    #[display("single-quoted")]
    SingleQuoted,
    /// `nb-double-char*` with backslash escapes
    #[display("double-quoted")]
    DoubleQuoted,
}

impl CharSet {
    /// Bit used for this set in a token's memo bitmap.
    #[must_use]
    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Check whether `text` belongs entirely to this set.
    ///
    /// The empty string only satisfies the quoted-body sets.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Self::Decimal => !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit()),
            Self::Word => !text.is_empty() && text.chars().all(is_word_char),
            Self::Uri => uri_text(text, |_| true),
            Self::Tag => uri_text(text, |ch| ch != '!' && !is_flow_indicator(ch)),
            Self::Anchor => {
                !text.is_empty() && text.chars().all(|ch| is_ns_char(ch) && !is_flow_indicator(ch))
            }
            Self::PlainSafe => {
                !text.is_empty() && text.chars().all(|ch| is_ns_char(ch) && !is_flow_indicator(ch))
            }
            Self::SingleQuoted => single_quoted_body(text),
            Self::DoubleQuoted => double_quoted_body(text),
        }
    }
}

/// `ns-word-char`: decimal digits, ASCII letters and `-`.
#[must_use]
pub const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-'
}

/// `c-flow-indicator`
#[must_use]
pub const fn is_flow_indicator(ch: char) -> bool {
    matches!(ch, ',' | '[' | ']' | '{' | '}')
}

/// `c-indicator`
#[must_use]
pub const fn is_indicator(ch: char) -> bool {
    matches!(
        ch,
        '-' | '?'
            | ':'
            | ','
            | '['
            | ']'
            | '{'
            | '}'
            | '#'
            | '&'
            | '*'
            | '!'
            | '|'
            | '>'
            | '\''
            | '"'
            | '%'
            | '@'
            | '`'
    )
}

/// `s-white`
#[must_use]
pub const fn is_white(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

/// `b-char`
#[must_use]
pub const fn is_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

/// `c-printable` minus the byte order mark.
#[must_use]
pub fn is_printable(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{7E}' | '\u{85}' | '\u{A0}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
        && ch != '\u{FEFF}'
}

/// `ns-char`: printable, not white, not a line break.
#[must_use]
pub fn is_ns_char(ch: char) -> bool {
    is_printable(ch) && !is_white(ch) && !is_break(ch)
}

/// `ns-uri-char` sequences, with `%XX` escapes, restricted by `extra`.
fn uri_text(text: &str, extra: impl Fn(char) -> bool) -> bool {
    if text.is_empty() {
        return false;
    }
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            let hex = [chars.next(), chars.next()];
            if !hex.iter().all(|h| h.is_some_and(|h| h.is_ascii_hexdigit())) {
                return false;
            }
            continue;
        }
        let uri_char = is_word_char(ch)
            || matches!(
                ch,
                '#' | ';'
                    | '/'
                    | '?'
                    | ':'
                    | '@'
                    | '&'
                    | '='
                    | '+'
                    | '$'
                    | ','
                    | '_'
                    | '.'
                    | '!'
                    | '~'
                    | '*'
                    | '\''
                    | '('
                    | ')'
                    | '['
                    | ']'
            );
        if !uri_char || !extra(ch) {
            return false;
        }
    }
    true
}

fn single_quoted_body(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.next() != Some('\'') {
                return false;
            }
        } else if !(is_printable(ch) || ch == '\u{FEFF}') {
            return false;
        }
    }
    true
}

fn double_quoted_body(text: &str) -> bool {
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => return false,
            _ if !(is_printable(ch) || ch == '\u{FEFF}') => return false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CharSet; 8] = [
        CharSet::Decimal,
        CharSet::Word,
        CharSet::Uri,
        CharSet::Tag,
        CharSet::Anchor,
        CharSet::PlainSafe,
        CharSet::SingleQuoted,
        CharSet::DoubleQuoted,
    ];

    #[test]
    fn test_each_set_has_its_own_bit() {
        let bits = ALL.iter().fold(0_u8, |seen, set| {
            assert_eq!(seen & set.bit(), 0, "{set:?} shares a bit");
            seen | set.bit()
        });
        assert_eq!(bits, u8::MAX);
    }

    #[test]
    fn test_decimal_and_word() {
        assert!(CharSet::Decimal.matches("123"));
        assert!(!CharSet::Decimal.matches("12a"));
        assert!(!CharSet::Decimal.matches(""));
        assert!(CharSet::Word.matches("my-handle2"));
        assert!(!CharSet::Word.matches("a_b"));
    }

    #[test]
    fn test_uri_and_tag() {
        assert!(CharSet::Uri.matches("tag:yaml.org,2002:str"));
        assert!(CharSet::Uri.matches("a%20b"));
        assert!(!CharSet::Uri.matches("a%2"));
        assert!(!CharSet::Uri.matches("a b"));
        assert!(CharSet::Tag.matches("str"));
        assert!(!CharSet::Tag.matches("a,b"));
        assert!(!CharSet::Tag.matches("a!b"));
    }

    #[test]
    fn test_anchor_and_plain_safe() {
        assert!(CharSet::Anchor.matches("anchor:1"));
        assert!(!CharSet::Anchor.matches("a]"));
        assert!(CharSet::PlainSafe.matches("a:b"));
        assert!(!CharSet::PlainSafe.matches("a,b"));
    }

    #[test]
    fn test_quoted_bodies() {
        assert!(CharSet::SingleQuoted.matches("it''s"));
        assert!(!CharSet::SingleQuoted.matches("it's"));
        assert!(CharSet::DoubleQuoted.matches(r#"say \"hi\""#));
        assert!(!CharSet::DoubleQuoted.matches(r#"say "hi""#));
        assert!(CharSet::DoubleQuoted.matches(""));
    }
}
