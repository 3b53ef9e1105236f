//! Lookup tables loaded from external text files.
//!
//! Two flavours, matching the two workflows that consume them:
//! `RenameMap` for exact ID-to-header rewrites, `PatternList` for
//! substring membership tests during partitioning. Both loaders skip
//! blank lines and `#` comments, and both tolerate malformed lines by
//! dropping them silently, matching the legacy workflow.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Exact-match rename table: first whitespace token of each line is the
/// source ID, the last token the replacement header. Middle tokens are
/// free-text descriptions and are ignored. Duplicate keys: last one wins.
#[derive(Debug, Default)]
pub struct RenameMap {
    entries: HashMap<String, String>,
}

impl RenameMap {
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if is_skippable(line) {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let key = match tokens.next() {
                Some(k) => k,
                None => continue,
            };
            // Lines with a single token carry no target; drop them.
            let value = match tokens.last() {
                Some(v) => v,
                None => continue,
            };
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(RenameMap { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        crate::seqio::require_input(path)?;
        let f = File::open(path)
            .with_context(|| format!("Failed to open rename map: {}", path.display()))?;
        Self::load(BufReader::new(f))
    }

    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Substring-match pattern list: one trimmed pattern per line, stored in
/// file order. Case-sensitive unless `ignore_case` is set at load time.
#[derive(Debug, Default)]
pub struct PatternList {
    patterns: Vec<String>,
    ignore_case: bool,
}

impl PatternList {
    pub fn load<R: BufRead>(reader: R, ignore_case: bool) -> Result<Self> {
        let mut patterns = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if is_skippable(line) {
                continue;
            }
            if ignore_case {
                patterns.push(line.to_lowercase());
            } else {
                patterns.push(line.to_string());
            }
        }
        Ok(PatternList { patterns, ignore_case })
    }

    pub fn from_path(path: &Path, ignore_case: bool) -> Result<Self> {
        crate::seqio::require_input(path)?;
        let f = File::open(path)
            .with_context(|| format!("Failed to open pattern list: {}", path.display()))?;
        Self::load(BufReader::new(f), ignore_case)
    }

    /// True iff any stored pattern is a literal substring of `field`.
    pub fn matches_any(&self, field: &str) -> bool {
        if self.ignore_case {
            let field = field.to_lowercase();
            self.patterns.iter().any(|p| field.contains(p.as_str()))
        } else {
            self.patterns.iter().any(|p| field.contains(p.as_str()))
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
