//! Named pattern collections stored as versioned JSON documents.
//!
//! A signature set pairs human-readable names with pattern text so that a
//! library of known byte sequences can be kept next to the binaries it
//! describes and scanned in one pass.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::pattern::Pattern;
use crate::scan::{Match, Scanner};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub name: String,
    pub pattern: String,
}

impl SignatureEntry {
    /// Compile this entry's pattern text.
    pub fn compile(&self) -> Result<Pattern> {
        Pattern::compile(&self.pattern)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureSet {
    pub version: String,
    pub entries: Vec<SignatureEntry>,
}

impl SignatureSet {
    pub fn entry(&self, name: &str) -> Option<&SignatureEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Scan a buffer against every entry, pairing each entry name with its
    /// matches. An entry that fails to compile aborts the whole scan.
    pub fn scan_all(&self, buffer: &[u8]) -> Result<Vec<(String, Vec<Match>)>> {
        let scanner = Scanner::new(buffer);
        let mut results = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let matches = scanner.find(&entry.pattern)?;
            debug!("Signature '{}': {} match(es)", entry.name, matches.len());
            results.push((entry.name.clone(), matches));
        }
        Ok(results)
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureSet> {
    let content = fs::read_to_string(&path)?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &SignatureSet) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}
