// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Nesting of paired tokens: flow brackets and quotes.

use crate::span::{Position, Span};
use crate::token::TokenKind;

/// An opener still waiting for its closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenPair {
    /// The closer that would balance this opener.
    pub expected: TokenKind,
    pub position: Position,
    pub span: Span,
}

/// Tracks which closer is expected next.
///
/// The parser snapshots the checker together with its own checkpoints so that
/// speculative parses never leave stale openers behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceChecker {
    open: Vec<OpenPair>,
    mismatched: bool,
}

impl BalanceChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token of `kind`.
    ///
    /// Returns `false` when `kind` is a closer that does not match the
    /// innermost opener. The checker then drops openers down to a matching
    /// one, if any, so a single stray closer is reported once.
    pub fn add(&mut self, kind: TokenKind, position: Position, span: Span) -> bool {
        if let Some(expected) = kind.closer() {
            self.open.push(OpenPair {
                expected,
                position,
                span,
            });
            return true;
        }
        if !kind.is_closer() {
            return true;
        }
        if self.open.last().is_some_and(|top| top.expected == kind) {
            self.open.pop();
            return true;
        }
        self.mismatched = true;
        if let Some(index) = self.open.iter().rposition(|pair| pair.expected == kind) {
            self.open.truncate(index);
        }
        false
    }

    /// Returns `true` when every opener was closed in order.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.open.is_empty() && !self.mismatched
    }

    /// The innermost opener still waiting for its closer.
    #[must_use]
    pub fn last_unmatched(&self) -> Option<&OpenPair> {
        self.open.last()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Capture the current state for a later [`Self::restore`].
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }
}
