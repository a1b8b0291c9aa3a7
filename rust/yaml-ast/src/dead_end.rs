// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Detection of productions retried at one position without progress.

use std::collections::HashMap;

use crate::span::Position;
use crate::token::Token;

/// Default number of attempts allowed at one position.
pub const DEFAULT_THRESHOLD: u32 = 10_000;

/// Counts attempts per source position.
#[derive(Debug, Clone)]
pub struct DeadEndFinder {
    visits: HashMap<Position, u32>,
    threshold: u32,
}

impl Default for DeadEndFinder {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl DeadEndFinder {
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            visits: HashMap::new(),
            threshold,
        }
    }

    /// Count an attempt at `token`'s start.
    ///
    /// Returns `true` once the count exceeds the threshold.
    pub fn mark(&mut self, token: &Token) -> bool {
        let count = self.visits.entry(token.start).or_insert(0);
        *count = count.saturating_add(1);
        *count > self.threshold
    }

    #[must_use]
    pub fn visits(&self, position: Position) -> u32 {
        self.visits.get(&position).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
