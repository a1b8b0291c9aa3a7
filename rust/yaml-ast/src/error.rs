// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Error types for YAML parsing.
//!
//! Grammar mismatches are never errors: a production that does not match
//! returns [`crate::Node::Invalid`] and the caller tries the next alternative.
//! Only the conditions below are recorded, and the parse still completes with
//! whatever AST could be built.

use crate::span::{Position, Span};

/// A fatal condition encountered during YAML parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error
    pub kind: ErrorKind,
    /// The span in the source where the error occurred
    pub span: Span,
    /// Row/column of the start of the offending input
    pub position: Position,
    /// What was actually found (for diagnostic messages)
    pub found: Option<String>,
    /// Expected tokens (for diagnostic messages)
    pub expected: Vec<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    /// A closing bracket or quote with no matching opener.
    #[display("unbalanced closing token")]
    UnbalancedClosing,

    /// Input ended while a bracket or quote was still open.
    #[display("unbalanced opening token, expected {expected}")]
    UnbalancedOpening { expected: String },

    /// A tag is followed by text that cannot continue it.
    #[display("malformed tag")]
    MalformedTag,

    /// The same position was retried too many times without progress.
    #[display("parser stuck in a dead end")]
    DeadEnd,

    /// Input that no document production could consume.
    #[display("unexpected token")]
    UnexpectedToken,

    /// Invalid escape sequence in a double-quoted scalar.
    #[display("invalid escape sequence '\\{_0}'")]
    InvalidEscape(char),

    /// Malformed `%YAML` or `%TAG` directive.
    #[display("invalid directive: {_0}")]
    InvalidDirective(String),
}

impl ErrorKind {
    /// Get a suggestion for how to fix this error.
    ///
    /// Returns `Some(suggestion)` if a helpful fix suggestion is available,
    /// or `None` if no specific suggestion applies.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnbalancedClosing => Some("Remove the closing token or add the matching opener"),
            Self::UnbalancedOpening { .. } => Some("Add the missing closing bracket or quote"),
            Self::MalformedTag => Some(
                "Tags are !local, !!core, !handle!suffix or !<verbatim> with URI characters only",
            ),
            Self::InvalidEscape(_) => {
                Some("Valid escapes include \\n, \\t, \\\\, \\\", \\x##, \\u#### and \\U########")
            }
            Self::InvalidDirective(_) => {
                Some("Directive format: %YAML 1.2 or %TAG !handle! prefix")
            }
            Self::DeadEnd | Self::UnexpectedToken => None,
        }
    }

    /// Returns `true` for the fatal structural kinds.
    ///
    /// The remaining kinds describe local problems in otherwise parseable input.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedClosing
                | Self::UnbalancedOpening { .. }
                | Self::MalformedTag
                | Self::DeadEnd
        )
    }
}

impl ParseError {
    /// Create a new error with just a kind and location.
    #[must_use]
    pub const fn new(kind: ErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
            found: None,
            expected: Vec::new(),
        }
    }

    /// Add expected tokens to the error.
    #[must_use]
    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    /// Add the found token to the error.
    #[must_use]
    pub fn with_found(mut self, found: String) -> Self {
        self.found = Some(found);
        self
    }

    /// Get a suggestion for how to fix this error.
    ///
    /// Delegates to [`ErrorKind::suggestion()`].
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        self.kind.suggestion()
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)?;
        if let Some(found) = &self.found {
            write!(f, ", found {found}")?;
        }
        if !self.expected.is_empty() && !matches!(self.kind, ErrorKind::UnbalancedOpening { .. })
        {
            write!(f, ", expected one of: {}", self.expected.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::span;

    #[test]
    fn test_error_display() {
        let err = ParseError::new(ErrorKind::DeadEnd, span(0, 1), Position::new(2, 4));
        assert_eq!(err.to_string(), "2:4: parser stuck in a dead end");
    }

    #[test]
    fn test_error_display_with_context() {
        let test_cases = [
            (
                ErrorKind::UnbalancedOpening {
                    expected: "']'".to_owned(),
                },
                "1:0: unbalanced opening token, expected ']'",
            ),
            (ErrorKind::InvalidEscape('q'), "1:0: invalid escape sequence '\\q'"),
            (
                ErrorKind::InvalidDirective("expected version".to_owned()),
                "1:0: invalid directive: expected version",
            ),
        ];

        for (kind, expected_msg) in test_cases {
            let err = ParseError::new(kind, span(0, 1), Position::START);
            assert_eq!(err.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_found_and_expected() {
        let err = ParseError::new(ErrorKind::UnexpectedToken, span(4, 5), Position::new(1, 4))
            .with_found("']'".to_owned())
            .with_expected(vec!["document".to_owned()]);
        assert_eq!(
            err.to_string(),
            "1:4: unexpected token, found ']', expected one of: document"
        );
    }

    #[test]
    fn test_error_suggestions() {
        let with_suggestions = [
            ErrorKind::UnbalancedClosing,
            ErrorKind::UnbalancedOpening {
                expected: "'}'".to_owned(),
            },
            ErrorKind::MalformedTag,
            ErrorKind::InvalidEscape('x'),
            ErrorKind::InvalidDirective(String::new()),
        ];
        for kind in with_suggestions {
            assert!(
                kind.suggestion().is_some(),
                "{kind:?} should have a suggestion"
            );
        }

        for kind in [ErrorKind::DeadEnd, ErrorKind::UnexpectedToken] {
            assert!(
                kind.suggestion().is_none(),
                "{kind:?} should not have a suggestion"
            );
        }
    }

    #[test]
    fn test_structural_kinds() {
        assert!(ErrorKind::DeadEnd.is_structural());
        assert!(ErrorKind::MalformedTag.is_structural());
        assert!(!ErrorKind::InvalidEscape('a').is_structural());
        assert!(!ErrorKind::UnexpectedToken.is_structural());
    }
}
