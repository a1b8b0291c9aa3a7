// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Checkpoint/commit/rollback buffering over any pull source.
//!
//! [`Checkpointed`] is used twice: under the tokenizer for rune lookahead and
//! under the parser for token backtracking.
//!
//! The accessor tracks a *current* item (the one returned by the last call to
//! [`Checkpointed::next`]). Items are kept in a replay buffer only while a
//! checkpoint could still need them; without active checkpoints the buffer
//! shrinks back to the current item, so a rollback taken right at the edge of
//! the buffer still knows what was current.

use std::collections::VecDeque;

/// A source that yields one item per call.
///
/// Sources must be total: once exhausted they keep returning an end marker
/// (for example `None` or an EOF token).
pub trait Pull {
    type Item: Clone;

    fn pull(&mut self) -> Self::Item;
}

/// A [`Pull`] source with nested checkpoints and a replay buffer.
pub struct Checkpointed<S: Pull> {
    source: S,
    buffer: VecDeque<S::Item>,
    /// Index of the current item in `buffer`; `None` before the first item.
    cursor: Option<usize>,
    /// Saved cursors, innermost last.
    checkpoints: Vec<Option<usize>>,
}

impl<S: Pull> std::fmt::Debug for Checkpointed<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkpointed")
            .field("buffered", &self.buffer.len())
            .field("cursor", &self.cursor)
            .field("checkpoints", &self.checkpoints)
            .finish_non_exhaustive()
    }
}

impl<S: Pull> Checkpointed<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            cursor: None,
            checkpoints: Vec::new(),
        }
    }

    /// Advance and return the next item.
    ///
    /// Replays from the buffer when a rollback left items ahead of the cursor,
    /// otherwise pulls a fresh item from the source.
    pub fn next(&mut self) -> S::Item {
        let next_index = self.cursor.map_or(0, |index| index + 1);
        if let Some(item) = self.buffer.get(next_index).cloned() {
            self.cursor = Some(next_index);
            if self.checkpoints.is_empty() {
                self.compact();
            }
            return item;
        }

        let item = self.source.pull();
        if self.checkpoints.is_empty() {
            self.buffer.clear();
        }
        self.buffer.push_back(item.clone());
        self.cursor = Some(self.buffer.len() - 1);
        item
    }

    /// The item returned by the most recent [`Self::next`], if any.
    #[must_use]
    pub fn current(&self) -> Option<S::Item> {
        self.cursor.and_then(|index| self.buffer.get(index).cloned())
    }

    /// Remember the current read position.
    pub fn set_checkpoint(&mut self) {
        if self.checkpoints.is_empty() {
            self.compact();
        }
        self.checkpoints.push(self.cursor);
    }

    /// Drop the innermost checkpoint and keep everything consumed since.
    pub fn commit(&mut self) {
        self.checkpoints.pop();
        if self.checkpoints.is_empty() {
            self.compact();
        }
    }

    /// Return to the innermost checkpoint.
    ///
    /// Returns the item that was current when the checkpoint was taken, or
    /// `None` if it was taken before the first item. Without an active
    /// checkpoint this is a no-op that returns the current item.
    pub fn rollback(&mut self) -> Option<S::Item> {
        let Some(saved) = self.checkpoints.pop() else {
            return self.current();
        };
        self.cursor = saved;
        let item = self.current();
        if self.checkpoints.is_empty() {
            self.compact();
        }
        item
    }

    /// Number of active checkpoints.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Number of buffered items, including the current one.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Discard the items before the current one. Only valid without
    /// checkpoints, since saved cursors index into the buffer.
    fn compact(&mut self) {
        if let Some(index) = self.cursor {
            if index > 0 {
                self.buffer.drain(..index);
                self.cursor = Some(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Yields 0, 1, 2, ... forever.
    #[derive(Debug, Default)]
    struct Counter(u32);

    impl Pull for Counter {
        type Item = u32;

        fn pull(&mut self) -> u32 {
            let value = self.0;
            self.0 += 1;
            value
        }
    }

    #[test]
    fn test_plain_next() {
        let mut acc = Checkpointed::new(Counter::default());
        assert_eq!(acc.current(), None);
        assert_eq!(acc.next(), 0);
        assert_eq!(acc.next(), 1);
        assert_eq!(acc.current(), Some(1));
        assert_eq!(acc.buffered(), 1);
    }

    #[test]
    fn test_rollback_replays() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.next();
        acc.set_checkpoint();
        assert_eq!(acc.next(), 1);
        assert_eq!(acc.next(), 2);
        assert_eq!(acc.rollback(), Some(0));
        assert_eq!(acc.next(), 1);
        assert_eq!(acc.next(), 2);
        assert_eq!(acc.next(), 3);
        assert_eq!(acc.depth(), 0);
    }

    #[test]
    fn test_rollback_before_first_item() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.set_checkpoint();
        assert_eq!(acc.next(), 0);
        assert_eq!(acc.rollback(), None);
        assert_eq!(acc.next(), 0);
    }

    #[test]
    fn test_commit_keeps_progress() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.next();
        acc.set_checkpoint();
        acc.next();
        acc.next();
        acc.commit();
        assert_eq!(acc.current(), Some(2));
        assert_eq!(acc.buffered(), 1);
        assert_eq!(acc.next(), 3);
    }

    #[test]
    fn test_nested_checkpoint_restores_outer() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.next();
        acc.set_checkpoint();
        acc.next();
        acc.set_checkpoint();
        acc.next();
        acc.commit();
        assert_eq!(acc.rollback(), Some(0));
        assert_eq!(acc.next(), 1);
    }

    #[test]
    fn test_inner_rollback_keeps_outer() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.set_checkpoint();
        acc.next();
        acc.set_checkpoint();
        acc.next();
        acc.next();
        assert_eq!(acc.rollback(), Some(0));
        assert_eq!(acc.next(), 1);
        assert_eq!(acc.rollback(), None);
        assert_eq!(acc.next(), 0);
    }

    #[test]
    fn test_rollback_without_checkpoint() {
        let mut acc = Checkpointed::new(Counter::default());
        acc.next();
        assert_eq!(acc.rollback(), Some(0));
        assert_eq!(acc.next(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Next,
        Speculate(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Next), (0u8..6).prop_map(Op::Speculate)]
    }

    proptest! {
        /// Checkpoint, read some items, roll back: the caller observes the same
        /// sequence as if the speculative reads never happened.
        #[test]
        fn prop_rollback_is_transparent(ops in prop::collection::vec(op(), 0..40)) {
            let mut acc = Checkpointed::new(Counter::default());
            let mut observed = Vec::new();
            for op in ops {
                match op {
                    Op::Next => observed.push(acc.next()),
                    Op::Speculate(count) => {
                        acc.set_checkpoint();
                        for _ in 0..count {
                            acc.next();
                        }
                        acc.rollback();
                    }
                }
            }
            let expected: Vec<u32> = (0..u32::try_from(observed.len()).unwrap_or(0)).collect();
            prop_assert_eq!(observed, expected);
            prop_assert_eq!(acc.depth(), 0);
        }
    }
}
