use std::path::PathBuf;
use thiserror::Error;

/// Contract-level errors. Anything not listed here is propagated as a plain
/// `anyhow` error with context.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Map file, genome file, or index missing. Fatal before any output.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// A FASTA header line with no text after '>'. Fatal for the stream,
    /// since the header/body association is broken.
    #[error("empty FASTA header")]
    EmptyHeader,
}
