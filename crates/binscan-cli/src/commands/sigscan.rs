//! Sigscan command implementation.
//!
//! Runs every entry of a JSON signature set over a file and reports the
//! per-entry match counts and offsets.

use anyhow::{Context, Result, bail};
use binscan_core::{Match, Scanner, load_signatures};
use std::fs;
use std::path::Path;
use tracing::info;

/// Offsets listed per entry before the output is truncated.
const MAX_LISTED_OFFSETS: usize = 8;

/// Run the sigscan command
pub fn run(file: &Path, signatures: &Path, name: Option<&str>) -> Result<()> {
    let set = load_signatures(signatures)
        .with_context(|| format!("Failed to load signatures from {}", signatures.display()))?;
    info!(
        "Loaded signature set version {} ({} entries)",
        set.version,
        set.entries.len()
    );

    let buffer =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    match name {
        Some(name) => {
            let Some(entry) = set.entry(name) else {
                bail!(
                    "Signature entry '{}' not found in {}",
                    name,
                    signatures.display()
                );
            };
            let matches = Scanner::new(&buffer)
                .find(&entry.pattern)
                .with_context(|| format!("Signature '{}' failed to compile", entry.name))?;
            report(&entry.name, &matches);
        }
        None => {
            for (name, matches) in set.scan_all(&buffer)? {
                report(&name, &matches);
            }
        }
    }

    Ok(())
}

fn report(name: &str, matches: &[Match]) {
    if matches.is_empty() {
        println!("{name:<24} no matches");
        return;
    }

    let mut offsets = matches
        .iter()
        .take(MAX_LISTED_OFFSETS)
        .map(|hit| format!("{:#X}", hit.offset))
        .collect::<Vec<_>>()
        .join(", ");
    if matches.len() > MAX_LISTED_OFFSETS {
        offsets.push_str(", ..");
    }
    println!("{name:<24} {} match(es) at {offsets}", matches.len());
}
