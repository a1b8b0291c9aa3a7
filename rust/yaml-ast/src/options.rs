// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Parser configuration.

use crate::dead_end::DEFAULT_THRESHOLD;
use crate::token_source::TokenStreamConstructor;

/// Options recognized by [`crate::parse_with_options`] and friends.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Return the lone [`crate::Node::Document`] of a single-document stream
    /// instead of the enclosing [`crate::Node::Stream`].
    pub omit_stream_wrapper: bool,
    /// Replace the default tokenizer when parsing text or bytes.
    pub token_stream: Option<TokenStreamConstructor>,
    /// Attempts allowed at one position before a dead end is reported.
    pub dead_end_threshold: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            omit_stream_wrapper: false,
            token_stream: None,
            dead_end_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_omit_stream_wrapper(mut self, omit: bool) -> Self {
        self.omit_stream_wrapper = omit;
        self
    }

    #[must_use]
    pub const fn with_token_stream(mut self, constructor: TokenStreamConstructor) -> Self {
        self.token_stream = Some(constructor);
        self
    }

    #[must_use]
    pub const fn with_dead_end_threshold(mut self, threshold: u32) -> Self {
        self.dead_end_threshold = threshold;
        self
    }
}
