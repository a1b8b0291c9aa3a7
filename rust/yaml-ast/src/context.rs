// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Lexical context stack used by the tokenizer.
//!
//! The meaning of a character depends on where it appears: `:` inside a
//! quoted scalar is text, `,` only separates entries inside a flow
//! collection, and so on. The tokenizer owns a [`ContextStack`] and every
//! transition is an explicit push or pop on it.

use log::trace;

/// One frame of lexical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LexContext {
    /// Indentation-based layout; the bottom of every stack.
    #[display("block")]
    Block,
    /// Inside `[...]` or `{...}`.
    #[display("flow")]
    Flow,
    /// After `#` until the end of the line.
    #[display("comment")]
    Comment,
    #[display("single-quoted")]
    SingleQuoted,
    #[display("double-quoted")]
    DoubleQuoted,
    /// After `!`; `verbatim` once `!<` was seen.
    #[display("tag")]
    Tag { verbatim: bool },
    /// After `|` or `>` until the end of the header line.
    ///
    /// `threshold` is the indentation the body lines must exceed, `-1` for
    /// top-level scalars.
    #[display("block scalar header")]
    BlockScalarHeader { threshold: i32 },
    /// Lines of a literal or folded scalar.
    #[display("block scalar body")]
    BlockScalarBody { threshold: i32 },
}

impl LexContext {
    /// Frames that a line break ends.
    const fn ends_at_line_break(self) -> bool {
        matches!(
            self,
            Self::Comment | Self::Tag { .. } | Self::BlockScalarHeader { .. }
        )
    }
}

/// The tokenizer's stack of lexical frames.
///
/// The bottom [`LexContext::Block`] frame is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStack {
    frames: Vec<LexContext>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![LexContext::Block],
        }
    }

    /// The innermost frame.
    #[must_use]
    pub fn current(&self) -> LexContext {
        self.frames.last().copied().unwrap_or(LexContext::Block)
    }

    /// The innermost block or flow frame.
    #[must_use]
    pub fn layout(&self) -> LexContext {
        self.frames
            .iter()
            .rev()
            .copied()
            .find(|frame| matches!(frame, LexContext::Block | LexContext::Flow))
            .unwrap_or(LexContext::Block)
    }

    /// Returns `true` when the innermost layout frame is a flow collection.
    #[must_use]
    pub fn in_flow(&self) -> bool {
        self.layout() == LexContext::Flow
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: LexContext) {
        trace!("lexer context push {frame} (depth {})", self.frames.len());
        self.frames.push(frame);
    }

    /// Pop the innermost frame; the bottom block frame stays.
    pub fn pop(&mut self) -> Option<LexContext> {
        if self.frames.len() <= 1 {
            return None;
        }
        let frame = self.frames.pop();
        if let Some(frame) = frame {
            trace!("lexer context pop {frame}");
        }
        frame
    }

    /// Pop the innermost frame if it satisfies `pred`.
    pub fn pop_if(&mut self, pred: impl Fn(LexContext) -> bool) -> Option<LexContext> {
        if pred(self.current()) {
            self.pop()
        } else {
            None
        }
    }

    /// Replace the innermost frame.
    pub fn replace(&mut self, frame: LexContext) {
        if self.frames.len() > 1 {
            if let Some(top) = self.frames.last_mut() {
                *top = frame;
            }
        } else {
            self.push(frame);
        }
    }

    /// Apply the effect of a line break.
    ///
    /// Comment, tag and block scalar header frames end; a finished header
    /// opens the scalar body. Quoted, flow and block frames survive.
    pub fn on_line_break(&mut self) {
        while self.current().ends_at_line_break() {
            if let Some(LexContext::BlockScalarHeader { threshold }) = self.pop() {
                self.push(LexContext::BlockScalarBody { threshold });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_frame_is_permanent() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), LexContext::Block);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_layout_sees_through_quotes() {
        let mut stack = ContextStack::new();
        stack.push(LexContext::Flow);
        stack.push(LexContext::DoubleQuoted);
        assert!(stack.in_flow());
        assert_eq!(stack.current(), LexContext::DoubleQuoted);
        stack.pop();
        stack.pop();
        assert!(!stack.in_flow());
    }

    #[test]
    fn test_line_break_ends_single_line_frames() {
        let mut stack = ContextStack::new();
        stack.push(LexContext::Flow);
        stack.push(LexContext::Tag { verbatim: false });
        stack.on_line_break();
        assert_eq!(stack.current(), LexContext::Flow);

        stack.push(LexContext::SingleQuoted);
        stack.on_line_break();
        assert_eq!(stack.current(), LexContext::SingleQuoted);
    }

    #[test]
    fn test_header_turns_into_body() {
        let mut stack = ContextStack::new();
        stack.push(LexContext::BlockScalarHeader { threshold: 2 });
        stack.push(LexContext::Comment);
        stack.on_line_break();
        assert_eq!(
            stack.current(),
            LexContext::BlockScalarBody { threshold: 2 }
        );
        // The body itself survives further line breaks.
        stack.on_line_break();
        assert_eq!(
            stack.current(),
            LexContext::BlockScalarBody { threshold: 2 }
        );
    }

    #[test]
    fn test_replace_and_pop_if() {
        let mut stack = ContextStack::new();
        stack.push(LexContext::Tag { verbatim: false });
        stack.replace(LexContext::Tag { verbatim: true });
        assert_eq!(stack.current(), LexContext::Tag { verbatim: true });
        assert_eq!(
            stack.pop_if(|frame| frame == LexContext::Flow),
            None
        );
        assert_eq!(
            stack.pop_if(|frame| matches!(frame, LexContext::Tag { .. })),
            Some(LexContext::Tag { verbatim: true })
        );
    }
}
