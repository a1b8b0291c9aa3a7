// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! UTF-8 decoding of the input buffer, one code point at a time.

use crate::checkpoint::Pull;

/// One decoded code point and the number of source bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rune {
    pub ch: char,
    pub width: usize,
}

/// Decodes a byte buffer into runes.
///
/// Invalid UTF-8 sequences decode to `U+FFFD`, consuming the invalid bytes.
/// After the end of input every pull returns `None`.
#[derive(Debug, Clone)]
pub struct Runes<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Runes<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Byte offset of the next rune to decode.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn decode(&self) -> Option<Rune> {
        let rest = self.bytes.get(self.offset..).filter(|rest| !rest.is_empty())?;
        let chunk = rest.get(..rest.len().min(4)).unwrap_or(rest);
        let valid = match std::str::from_utf8(chunk) {
            Ok(text) => text,
            Err(err) => chunk
                .get(..err.valid_up_to())
                .and_then(|prefix| std::str::from_utf8(prefix).ok())
                .unwrap_or_default(),
        };
        if let Some(ch) = valid.chars().next() {
            return Some(Rune {
                ch,
                width: ch.len_utf8(),
            });
        }
        // The invalid sequence sits at the very start of the chunk.
        let width = match std::str::from_utf8(chunk) {
            Err(err) => err.error_len().unwrap_or(chunk.len()),
            Ok(_) => chunk.len(),
        };
        Some(Rune {
            ch: char::REPLACEMENT_CHARACTER,
            width: width.max(1),
        })
    }
}

impl Pull for Runes<'_> {
    type Item = Option<Rune>;

    fn pull(&mut self) -> Option<Rune> {
        let rune = self.decode()?;
        self.offset += rune.width;
        Some(rune)
    }
}
