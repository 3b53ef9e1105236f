//! panprep: pangenome FASTA preparation CLI
//!
//! Subcommands:
//! - `rename`: rewrite FASTA headers from a rename map or normalize them
//!   to chromosome tokens
//! - `partition`: split an indexed assembly's ID set by chromosome name
//! - `merge`: concatenate per-sample genomes with `Sample#Hap#Scaffold`
//!   headers and per-genome scaffold maps

mod error;
mod merge;
mod partition;
mod rename;
mod seqio;
mod table;
mod token;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

/// panprep CLI
#[derive(Parser, Debug)]
#[command(name = "panprep")]
#[command(author, version, about = "Pangenome FASTA preparation utilities", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite FASTA headers from a rename map or to chromosome tokens
    Rename(rename::RenameArgs),
    /// Partition an assembly's sequence IDs by chromosome name
    Partition(partition::PartitionArgs),
    /// Merge per-sample genomes into one pangenome FASTA
    Merge(merge::MergeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_level = match cli.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    match cli.command {
        Commands::Rename(args) => rename::run(args)?,
        Commands::Partition(args) => partition::run(args)?,
        Commands::Merge(args) => merge::run(args)?,
    }
    Ok(())
}
