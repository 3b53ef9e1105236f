//! Partition an assembly's sequence IDs into a matched subset and its
//! complement (`partition`).
//!
//! The ID set comes from a `.fai`-style index (column 1 only). Each ID is
//! reduced to its chromosome subfield, the third `#`-delimited segment of
//! the `Sample#Haplotype#Scaffold` naming scheme, and tested against a
//! pattern list by literal substring match. The matched IDs and the rest
//! are written as one-per-line lists for an external sequence extractor.
//!
//! ### Example
//! ```text
//! panprep partition --fai merged.fasta.gz.fai --names chroms.txt --out-prefix split/A01
//! ```

use crate::seqio::require_input;
use crate::table::PatternList;
use anyhow::{Context, Result};
use clap::Args;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone)]
pub struct PartitionArgs {
    /// Assembly index (.fai); only the first column is read
    #[arg(long = "fai", value_name = "FAI")]
    pub fai: PathBuf,

    /// Pattern list: one name per line, substring-matched against the
    /// chromosome subfield of each ID
    #[arg(long = "names", value_name = "FILE", conflicts_with = "chromosome")]
    pub names: Option<PathBuf>,

    /// Group by exact subfield equality against this single chromosome
    /// name instead of a pattern list
    #[arg(long = "chromosome", value_name = "NAME")]
    pub chromosome: Option<String>,

    /// Prefix for output ID lists (<prefix>.matched.txt, <prefix>.rest.txt)
    #[arg(short = 'p', long = "out-prefix", value_name = "PREFIX")]
    pub out_prefix: PathBuf,

    /// Case-insensitive pattern matching
    #[arg(long = "ignore-case")]
    pub ignore_case: bool,
}

/// Outcome of one partition call. Both sides preserve the enumeration
/// order of the input index.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub matched: Vec<String>,
    pub rest: Vec<String>,
}

impl Partition {
    pub fn has_matches(&self) -> bool {
        !self.matched.is_empty()
    }

    pub fn has_rest(&self) -> bool {
        !self.rest.is_empty()
    }
}

/// The chromosome subfield of a structured ID: the third `#`-delimited
/// segment, or the whole ID when fewer than three segments exist.
pub fn subfield(id: &str) -> &str {
    let mut parts = id.split('#');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(third)) => third,
        _ => id,
    }
}

/// Classify every ID into matched or rest by substring membership of its
/// subfield in `patterns`. The two sides are disjoint and together cover
/// the input exactly.
pub fn partition(ids: &[String], patterns: &PatternList) -> Partition {
    let mut out = Partition::default();
    for id in ids {
        if patterns.matches_any(subfield(id)) {
            out.matched.push(id.clone());
        } else {
            out.rest.push(id.clone());
        }
    }
    out
}

/// Exact grouping mode: matched iff the subfield equals `chrom` exactly.
pub fn group_exact(ids: &[String], chrom: &str) -> Partition {
    let mut out = Partition::default();
    for id in ids {
        if subfield(id) == chrom {
            out.matched.push(id.clone());
        } else {
            out.rest.push(id.clone());
        }
    }
    out
}

/// Read the ordered, deduplicated ID set from a `.fai`-style index.
pub fn read_fai_ids(path: &Path) -> Result<Vec<String>> {
    require_input(path)?;
    let f = File::open(path)
        .with_context(|| format!("Failed to open index: {}", path.display()))?;
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        let id = match line.split_whitespace().next() {
            Some(id) => id,
            None => continue,
        };
        if seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

/// Write one ID per line, unless the artifact already exists (skipped with
/// a warning so partially-completed batches can be re-run safely).
fn write_id_list(path: &Path, ids: &[String]) -> Result<()> {
    if path.exists() {
        warn!("output exists, skipping: {}", path.display());
        return Ok(());
    }
    let f = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for id in ids {
        writeln!(w, "{}", id)?;
    }
    w.flush()?;
    info!("wrote {} ids to {}", ids.len(), path.display());
    Ok(())
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    name.push(".txt");
    PathBuf::from(name)
}

pub fn run(args: PartitionArgs) -> Result<()> {
    let ids = read_fai_ids(&args.fai)?;
    info!("{} sequence ids in {}", ids.len(), args.fai.display());

    let (split, matched_label) = match (&args.names, &args.chromosome) {
        (Some(names), None) => {
            let patterns = PatternList::from_path(names, args.ignore_case)?;
            if patterns.is_empty() {
                warn!("pattern list {} is empty", names.display());
            } else {
                info!("{} patterns loaded from {}", patterns.len(), names.display());
            }
            (partition(&ids, &patterns), "matched".to_string())
        }
        (None, Some(chrom)) => (group_exact(&ids, chrom), chrom.clone()),
        _ => anyhow::bail!("Provide exactly one of --names or --chromosome"),
    };

    if split.has_matches() {
        write_id_list(&with_suffix(&args.out_prefix, &matched_label), &split.matched)?;
    } else {
        warn!("no ids matched; not writing a matched list");
    }
    if split.has_rest() {
        write_id_list(&with_suffix(&args.out_prefix, "rest"), &split.rest)?;
    } else {
        warn!("every id matched; not writing a rest list");
    }

    info!("matched {} / rest {}", split.matched.len(), split.rest.len());
    Ok(())
}
