//! Hexdump command implementation.
//!
//! Displays a region of a file in traditional hexdump format, useful for
//! eyeballing the area around a match or checking what a pattern should
//! look like in the first place.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::render::{DumpOptions, render_hexdump};

/// Run the hexdump command
pub fn run(file: &Path, offset: usize, size: Option<usize>, ascii: bool) -> Result<()> {
    let buffer =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    if offset > buffer.len() {
        bail!(
            "Offset {:#X} is past the end of {} ({} bytes)",
            offset,
            file.display(),
            buffer.len()
        );
    }

    let end = match size {
        Some(size) => (offset + size).min(buffer.len()),
        None => buffer.len(),
    };

    let opts = DumpOptions {
        ascii,
        ..Default::default()
    };
    render_hexdump(
        &mut std::io::stdout().lock(),
        &buffer[offset..end],
        offset,
        &[],
        &opts,
    )?;

    Ok(())
}
