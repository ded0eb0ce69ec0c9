//! Columnar hex+ASCII rendering with match highlighting.
//!
//! # Output Format
//!
//! ```text
//! 00000000  48 65 6C 6C 6F 2C 20 77  6F 72 6C 64 2C 20 68 6F  |Hello, world, ho|
//! 00000010  77 20 61 72 65 20 79 6F  75 20 3A 44 0A           |w are you :D.|
//! 0000001D
//! ```
//!
//! Bytes falling inside a match range are drawn on a green background.

use binscan_core::Match;
use owo_colors::OwoColorize;
use std::io::{self, Write};

pub struct DumpOptions {
    pub color: bool,
    pub ascii: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            color: true,
            ascii: true,
        }
    }
}

/// Render `bytes` as a hex dump, highlighting the given match ranges.
///
/// `base_offset` is the buffer offset of the first byte of `bytes`; the
/// highlight ranges are expressed against the same buffer, so a partial
/// region can be rendered without re-basing the matches. The ranges must be
/// sorted and non-overlapping, which is how the scanner emits them.
pub fn render_hexdump(
    out: &mut impl Write,
    bytes: &[u8],
    base_offset: usize,
    highlights: &[Match],
    opts: &DumpOptions,
) -> io::Result<()> {
    let mut current = 0usize;

    for (row, chunk) in bytes.chunks(16).enumerate() {
        let row_offset = base_offset + row * 16;
        write!(out, "{row_offset:08X}  ")?;

        for (i, byte) in chunk.iter().enumerate() {
            if i == 8 {
                write!(out, " ")?;
            }

            let absolute = row_offset + i;
            while current < highlights.len() && highlights[current].end() <= absolute {
                current += 1;
            }
            let highlighted = highlights
                .get(current)
                .is_some_and(|hit| hit.contains(absolute));

            if opts.color && highlighted {
                write!(out, "{}", format!("{byte:02X}").on_green())?;
            } else {
                write!(out, "{byte:02X}")?;
            }
            write!(out, " ")?;
        }

        for i in chunk.len()..16 {
            if i == 8 {
                write!(out, " ")?;
            }
            write!(out, "   ")?;
        }

        if opts.ascii {
            write!(out, " |")?;
            for byte in chunk {
                let ch = if (0x20..0x7F).contains(byte) {
                    *byte as char
                } else {
                    '.'
                };
                write!(out, "{ch}")?;
            }
            write!(out, "|")?;
        }

        writeln!(out)?;
    }

    writeln!(out, "{:08X}", base_offset + bytes.len())?;
    Ok(())
}
