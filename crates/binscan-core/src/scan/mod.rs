//! Sliding scan of a compiled pattern over a byte buffer.
//!
//! The scanner owns nothing but a borrowed buffer. Each call compiles (or
//! borrows) a pattern, drives it byte-by-byte through a fresh [`MatchState`],
//! and restarts from the next byte whenever a token fails, so matches are
//! collected in order and never overlap.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pattern::{MatchState, Pattern};

/// One hit: a half-open byte range into the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub offset: usize,
    pub length: usize,
}

impl Match {
    /// Exclusive end offset of the matched range.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }

    /// Whether the given buffer offset falls inside the matched range.
    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }
}

/// Scans a buffer for every non-overlapping occurrence of a pattern.
pub struct Scanner<'b> {
    buffer: &'b [u8],
}

impl<'b> Scanner<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer }
    }

    /// Compile `pattern_text` and collect every match in buffer order.
    ///
    /// Compilation errors abort the call before any scanning begins; a
    /// pattern that compiles to zero tokens yields an empty result rather
    /// than an error.
    pub fn find(&self, pattern_text: &str) -> Result<Vec<Match>> {
        let pattern = Pattern::compile(pattern_text)?;
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let matches: Vec<Match> = self.matches(&pattern)?.collect();
        debug!(
            "Pattern '{}' matched {} time(s) in {} bytes",
            pattern,
            matches.len(),
            self.buffer.len()
        );
        Ok(matches)
    }

    /// Lazily iterate the matches of a compiled pattern.
    ///
    /// Refuses an empty pattern: a trivially complete pattern would match at
    /// every offset.
    pub fn matches<'p>(&self, pattern: &'p Pattern) -> Result<Matches<'p, 'b>> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        Ok(Matches {
            pattern,
            buffer: self.buffer,
            state: pattern.begin_match(),
            pos: 0,
        })
    }
}

/// Scan `buffer` for all matches of the given pattern text.
pub fn find(buffer: &[u8], pattern_text: &str) -> Result<Vec<Match>> {
    Scanner::new(buffer).find(pattern_text)
}

/// Iterator over the non-overlapping matches of one pattern in one buffer.
pub struct Matches<'p, 'b> {
    pattern: &'p Pattern,
    buffer: &'b [u8],
    state: MatchState,
    pos: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while self.pos < self.buffer.len() {
            // While idle, a fully-specified leading byte lets memchr skip
            // the positions where the first token cannot possibly match.
            // Every skipped position is one the byte-at-a-time shift would
            // have rejected, so results are identical.
            if self.state.is_idle()
                && let Some(byte) = self.pattern.first_literal()
            {
                match memchr::memchr(byte, &self.buffer[self.pos..]) {
                    Some(skip) => self.pos += skip,
                    None => {
                        self.pos = self.buffer.len();
                        return None;
                    }
                }
            }

            let (consumed, matched) =
                self.pattern
                    .advance(&mut self.state, self.pos, &self.buffer[self.pos..]);

            if !matched {
                self.pos += 1;
                continue;
            }

            self.pos += consumed;
            if self.pattern.is_complete(&self.state) {
                let hit = Match {
                    offset: self.state.start(),
                    length: self.state.length(),
                };
                self.state.reset();
                // A completed zero-length match leaves the read cursor where
                // it was; step past it to keep the scan finite.
                if hit.length == 0 {
                    self.pos += 1;
                }
                return Some(hit);
            }
        }
        None
    }
}
