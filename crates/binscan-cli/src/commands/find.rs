//! Find command implementation.
//!
//! Scans a file for a single pattern and lists every match, optionally as
//! JSON or as a highlighted hex dump.

use anyhow::{Context, Result};
use binscan_core::Scanner;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::render::{DumpOptions, render_hexdump};

/// Longest match prefix echoed per result line.
const PREVIEW_BYTES: usize = 16;

/// Run the find command
pub fn run(file: &Path, pattern: &str, dump: bool, json: bool, color: bool) -> Result<()> {
    let buffer =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    debug!("Loaded {} bytes from {}", buffer.len(), file.display());

    let matches = Scanner::new(&buffer)
        .find(pattern)
        .with_context(|| format!("Failed to compile pattern '{pattern}'"))?;

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &matches)?;
        println!();
        return Ok(());
    }

    if matches.is_empty() {
        println!("No matches");
        return Ok(());
    }

    for hit in &matches {
        let bytes = &buffer[hit.range()];
        let mut preview = bytes
            .iter()
            .take(PREVIEW_BYTES)
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        if bytes.len() > PREVIEW_BYTES {
            preview.push_str(" ..");
        }
        println!("{:08X}  {:>4} byte(s)  {}", hit.offset, hit.length, preview);
    }
    println!("{} match(es)", matches.len());

    if dump {
        println!();
        let opts = DumpOptions {
            color,
            ..Default::default()
        };
        render_hexdump(&mut std::io::stdout().lock(), &buffer, 0, &matches, &opts)?;
    }

    Ok(())
}
