// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Source locations: byte spans and row/column positions.

use chumsky::span::SimpleSpan;

/// A span representing a byte range in the source.
///
/// This is an alias for chumsky's `SimpleSpan`, which tracks byte offsets.
/// The span is a half-open range `[start, end)`.
pub type Span = SimpleSpan<usize>;

/// A row/column location in the source.
///
/// `row` is 1-based. `column` counts the runes already consumed on the
/// current line, so the first rune of a line starts at column 0 and a token's
/// start column equals its indentation when it is the first token on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{row}:{column}")]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    /// The position before the first rune of the input.
    pub const START: Self = Self { row: 1, column: 0 };

    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Position after consuming one rune that is not part of a line break.
    #[must_use]
    pub const fn advance(self) -> Self {
        Self {
            row: self.row,
            column: self.column + 1,
        }
    }

    /// Position after consuming a complete line break.
    #[must_use]
    pub const fn next_line(self) -> Self {
        Self {
            row: self.row + 1,
            column: 0,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// Build a span from a byte range.
#[must_use]
pub fn span(start: usize, end: usize) -> Span {
    use chumsky::span::Span as _;
    Span::new((), start..end)
}
