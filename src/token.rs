//! FASTA header tokenization: sequence ID extraction and chromosome-token
//! detection.
//!
//! Pangenome headers embed a chromosome/scaffold designator like `A3` or
//! `c09` anywhere in the free text. The scan is case-insensitive and the
//! leftmost in-range match wins; a header with no valid designator simply
//! yields no token.

use crate::error::PrepError;
use anyhow::{ensure, Result};
use regex::Regex;
use std::collections::HashMap;

/// ID and optional normalized chromosome token derived from one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderToken {
    /// First whitespace-delimited token of the header
    pub id: String,
    /// Normalized designator (e.g. `A01`), absent if none was found
    pub chrom: Option<String>,
}

/// Configurable letter+number chromosome pattern.
///
/// Each entry maps a designator letter to the highest valid chromosome
/// number for that letter (numbering always starts at 1). The default is
/// the Brassica convention: `A01..A10`, `C01..C09`.
pub struct ChromPattern {
    re: Regex,
    max_by_letter: HashMap<char, u32>,
}

impl ChromPattern {
    pub fn new(ranges: &[(char, u32)]) -> Result<Self> {
        let mut max_by_letter = HashMap::new();
        let mut letters = String::new();
        ensure!(!ranges.is_empty(), "chromosome pattern needs at least one letter");
        for &(letter, max) in ranges {
            ensure!(letter.is_ascii_alphabetic(), "invalid designator letter: {letter:?}");
            let letter = letter.to_ascii_uppercase();
            letters.push(letter);
            max_by_letter.insert(letter, max);
        }
        let re = Regex::new(&format!("(?i)[{}][0-9]{{1,2}}", letters))?;
        Ok(ChromPattern { re, max_by_letter })
    }

    /// Leftmost valid designator anywhere in `text`, normalized to an
    /// upper-case letter plus a zero-padded two-digit number.
    pub fn find_token(&self, text: &str) -> Option<String> {
        for m in self.re.find_iter(text) {
            let s = m.as_str();
            let letter = s.as_bytes()[0].to_ascii_uppercase() as char;
            let num = match s[1..].parse::<u32>() {
                Ok(n) => n,
                Err(_) => continue,
            };
            let max = match self.max_by_letter.get(&letter) {
                Some(&max) => max,
                None => continue,
            };
            if (1..=max).contains(&num) {
                return Some(format!("{}{:02}", letter, num));
            }
        }
        None
    }

    /// Split a raw header into its ID (first whitespace-delimited token)
    /// and optional chromosome token. Empty or whitespace-only headers are
    /// malformed FASTA.
    pub fn tokenize(&self, header: &str) -> Result<HeaderToken> {
        let id = match header.split_whitespace().next() {
            Some(id) => id.to_string(),
            None => return Err(PrepError::EmptyHeader.into()),
        };
        Ok(HeaderToken { id, chrom: self.find_token(header) })
    }
}

impl Default for ChromPattern {
    fn default() -> Self {
        // The letter set is statically valid, so the regex always compiles.
        ChromPattern::new(&[('A', 10), ('C', 9)]).unwrap()
    }
}
