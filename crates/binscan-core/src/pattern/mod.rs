//! Pattern compilation and the incremental matching state machine.
//!
//! A [`Pattern`] is an ordered sequence of [`Token`]s compiled from pattern
//! text such as `"48 8B ?? <7F+"`. The pattern is immutable after
//! compilation; the byte-by-byte progress of one match attempt lives in a
//! [`MatchState`] owned by whoever drives the scan, so a single compiled
//! pattern can serve any number of scans.

mod token;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};

pub use token::{Operation, Quantifier, Token};

/// Maximum length of a single pattern token, in characters.
pub const MAX_TOKEN_LEN: usize = 15;

/// An ordered sequence of byte-matching tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile pattern text into an ordered token sequence.
    ///
    /// Fails on the first malformed token, naming it. Whitespace-only text
    /// compiles to an empty pattern, which scanners refuse to run.
    pub fn compile(text: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        for part in text.split_whitespace() {
            let index = tokens.len();
            tokens.push(Token::parse(part, index)?);
        }
        debug!("Compiled pattern with {} token(s)", tokens.len());
        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn token_after(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index + 1)
    }

    /// The literal byte every match must begin with, if the leading token
    /// pins one down.
    pub(crate) fn first_literal(&self) -> Option<u8> {
        self.tokens.first().and_then(Token::required_first_byte)
    }

    /// Start a fresh match attempt.
    pub fn begin_match(&self) -> MatchState {
        MatchState::default()
    }

    /// Drive the token at the state's cursor against the remaining input.
    ///
    /// `position` is the read cursor's offset into the scanned buffer and
    /// `input` is the remainder of the buffer from that offset. On success
    /// the consumed byte count is returned and the cursor moves one token
    /// forward; on failure the state resets to idle and the caller
    /// re-attempts from the next byte.
    pub fn advance(&self, state: &mut MatchState, position: usize, input: &[u8]) -> (usize, bool) {
        let Some(token) = self.tokens.get(state.cursor) else {
            return (0, false);
        };

        let (consumed, matched) = token.matches(self, input);
        if !matched {
            state.reset();
            return (0, false);
        }

        if state.cursor == 0 {
            state.start = position;
            state.length = 0;
        }
        state.cursor += 1;
        state.length += consumed;
        (consumed, true)
    }

    /// Whether every token of the pattern has matched.
    pub fn is_complete(&self, state: &MatchState) -> bool {
        state.cursor == self.tokens.len()
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Mutable progress of one match attempt, owned by the scan rather than the
/// pattern.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    cursor: usize,
    start: usize,
    length: usize,
}

impl MatchState {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.cursor == 0
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn length(&self) -> usize {
        self.length
    }
}
