//! Shared gz-aware I/O and a streaming FASTA record reader.
//!
//! The reader yields one raw record at a time: the header line (without the
//! leading '>') and the body lines exactly as they appeared in the input.
//! Sequence data is never inspected or reformatted here.

use crate::error::PrepError;
use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One FASTA record, body untouched.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Full header text without the leading '>'
    pub header: String,
    /// Sequence lines, verbatim (newlines stripped)
    pub body: Vec<String>,
}

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("gz")).unwrap_or(false)
}

/// Fail with `InputNotFound` before any output is produced.
pub fn require_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PrepError::InputNotFound(path.to_path_buf()).into())
    }
}

pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    require_input(path)?;
    let f = File::open(path)
        .with_context(|| format!("Failed to open input: {}", path.display()))?;
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Open an output writer; gzipped if the name ends with .gz.
pub fn open_writer(path: &Path) -> Result<Box<dyn Write>> {
    let f = File::create(path)
        .with_context(|| format!("Failed to create output: {}", path.display()))?;
    if is_gz(path) {
        Ok(Box::new(BufWriter::new(GzEncoder::new(f, Compression::default()))))
    } else {
        Ok(Box::new(BufWriter::new(f)))
    }
}

fn trim_newline(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Streaming FASTA reader: one forward pass, only the current record buffered.
pub struct FastaReader<R: BufRead> {
    inner: R,
    /// Header of the next record, read ahead while scanning the current body
    pending: Option<String>,
    started: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        FastaReader { inner, pending: None, started: false }
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        let header_line = match self.pending.take() {
            Some(h) => h,
            None => {
                let mut line = String::new();
                loop {
                    line.clear();
                    if self.inner.read_line(&mut line)? == 0 {
                        return Ok(None);
                    }
                    trim_newline(&mut line);
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('>') {
                        break;
                    }
                    if !self.started {
                        return Err(anyhow!(
                            "Not a FASTA input: first non-empty line did not start with '>'"
                        ));
                    }
                    return Err(anyhow!("Stray sequence line outside any record"));
                }
                line
            }
        };
        self.started = true;

        let header = header_line[1..].trim().to_string();
        if header.is_empty() {
            return Err(PrepError::EmptyHeader.into());
        }

        let mut body = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.inner.read_line(&mut line)? == 0 {
                break;
            }
            trim_newline(&mut line);
            if line.starts_with('>') {
                self.pending = Some(line.clone());
                break;
            }
            if line.is_empty() {
                continue;
            }
            body.push(line.clone());
        }
        Ok(Some(RawRecord { header, body }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Write one record: '>' + header, then body lines verbatim.
pub fn write_record<W: Write>(w: &mut W, header: &str, body: &[String]) -> Result<()> {
    writeln!(w, ">{}", header)?;
    for line in body {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Result<Vec<RawRecord>> {
        FastaReader::new(Cursor::new(input.to_string())).collect()
    }

    #[test]
    fn streams_records_with_verbatim_bodies() {
        let recs = read_all(">s1 some description\nACGT\nacgt\n>s2\nNNNN\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].header, "s1 some description");
        assert_eq!(recs[0].body, vec!["ACGT", "acgt"]);
        assert_eq!(recs[1].header, "s2");
        assert_eq!(recs[1].body, vec!["NNNN"]);
    }

    #[test]
    fn skips_blank_lines_between_records() {
        let recs = read_all("\n>s1\nAC\n\nGT\n\n>s2\nTT\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].body, vec!["AC", "GT"]);
    }

    #[test]
    fn empty_header_is_fatal() {
        let err = read_all(">\nACGT\n").unwrap_err();
        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::EmptyHeader)));
    }

    #[test]
    fn rejects_non_fasta_input() {
        assert!(read_all("ACGT\n>s1\nAC\n").is_err());
    }

    #[test]
    fn handles_crlf_input() {
        let recs = read_all(">s1 desc\r\nACGT\r\n").unwrap();
        assert_eq!(recs[0].header, "s1 desc");
        assert_eq!(recs[0].body, vec!["ACGT"]);
    }

    #[test]
    fn reads_gzipped_input() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("in.fa.gz");
        let f = File::create(&path).unwrap();
        let mut gz = GzEncoder::new(f, Compression::default());
        gz.write_all(b">s1\nACGT\n").unwrap();
        gz.finish().unwrap();

        let rdr = open_reader(&path).unwrap();
        let recs: Vec<_> = FastaReader::new(rdr).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(recs[0].header, "s1");
    }
}
