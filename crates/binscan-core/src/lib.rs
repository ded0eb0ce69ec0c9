//! # binscan-core
//!
//! Core library for the binscan binary pattern scanner.
//!
//! This crate provides:
//! - A compact textual pattern language: exact bytes, nibble wildcards,
//!   numeric comparisons, and quantified repetition
//! - An incremental matching automaton driven byte-by-byte over a buffer
//! - A scanner that collects every non-overlapping match
//! - Named signature sets loadable from JSON
//!
//! Match results are plain data (offset + length). Rendering and I/O live in
//! consumers such as the `binscan` CLI.

pub mod error;
pub mod pattern;
pub mod scan;
pub mod signature;

pub use error::{Error, Result};
pub use pattern::{MatchState, Operation, Pattern, Quantifier, Token};
pub use scan::{Match, Matches, Scanner, find};
pub use signature::{SignatureEntry, SignatureSet, load_signatures, save_signatures};
