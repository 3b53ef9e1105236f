//! Header rewriter (`rename`).
//!
//! Streams a FASTA (plain or `.gz`) and rewrites each header, leaving the
//! sequence lines untouched. Two modes:
//!
//! - `--map FILE`: look the sequence ID up in a rename map; a hit replaces
//!   the whole header with the mapped name, a miss passes the record
//!   through unchanged. Partial maps are expected, so a miss is never an
//!   error.
//! - `--auto`: replace the header with the chromosome token detected in
//!   it (`>CP123876.1 chromosome A01, ...` becomes `>A01`); records with
//!   no detectable token pass through.
//!
//! ### Example
//! ```text
//! panprep rename --input genome.fa.gz --map chrom_names.txt --output renamed.fa
//! ```

use crate::seqio::{open_reader, open_writer, write_record, FastaReader};
use crate::table::RenameMap;
use crate::token::ChromPattern;
use anyhow::Result;
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Input FASTA (optionally gzipped)
    #[arg(short = 'i', long = "input", value_name = "FASTA")]
    pub input: PathBuf,

    /// Rename map: first token = sequence ID, last token = new header
    #[arg(short = 'm', long = "map", value_name = "FILE", required_unless_present = "auto")]
    pub map: Option<PathBuf>,

    /// Normalize headers to their detected chromosome token instead of
    /// using a map
    #[arg(long = "auto", conflicts_with = "map")]
    pub auto: bool,

    /// Output FASTA; gzipped if the name ends with .gz
    #[arg(short = 'o', long = "output", value_name = "FASTA")]
    pub output: PathBuf,
}

pub fn run(args: RenameArgs) -> Result<()> {
    let map = match &args.map {
        Some(path) => {
            let map = RenameMap::from_path(path)?;
            info!("loaded {} rename entries from {}", map.len(), path.display());
            Some(map)
        }
        None => None,
    };

    if args.output.exists() {
        warn!("output exists, skipping run: {}", args.output.display());
        return Ok(());
    }

    let pattern = ChromPattern::default();
    let reader = FastaReader::new(open_reader(&args.input)?);
    let mut out = open_writer(&args.output)?;

    let mut total = 0usize;
    let mut renamed = 0usize;
    for record in reader {
        let record = record?;
        total += 1;
        let new_header = match &map {
            Some(map) => {
                let id = pattern.tokenize(&record.header)?.id;
                map.lookup(&id).map(str::to_string)
            }
            None => pattern.find_token(&record.header),
        };
        match new_header {
            Some(h) => {
                renamed += 1;
                write_record(&mut out, &h, &record.body)?;
            }
            None => write_record(&mut out, &record.header, &record.body)?,
        }
    }
    out.flush()?;

    if renamed == 0 {
        warn!("no headers were renamed ({} records passed through)", total);
    }
    info!(
        "renamed {} of {} headers into {}",
        renamed,
        total,
        args.output.display()
    );
    Ok(())
}
