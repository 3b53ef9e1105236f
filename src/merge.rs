//! Pangenome merger (`merge`).
//!
//! Concatenates per-sample genomes into one FASTA, rewriting every header
//! to the `Sample#Haplotype#Scaffold` pangenome naming scheme. A scaffold
//! map (`original_id<TAB>new_id`) is written per input genome so the
//! original names can be recovered downstream.
//!
//! The genome list is a two-column text file, `SAMPLE_NAME path/to.fasta`
//! per line. Inputs may be gzipped; if the output name ends with `.gz` the
//! merged FASTA is gzipped too.
//!
//! ### Example
//! ```text
//! panprep merge genomes.txt pangenome.fa.gz maps/ --haplo-id 1
//! ```

use crate::seqio::{open_reader, open_writer, require_input, write_record, FastaReader};
use crate::token::ChromPattern;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Genome list: SAMPLE_NAME path/to/fasta per line
    #[arg(value_name = "GENOME_LIST")]
    pub genome_list: PathBuf,

    /// Merged output FASTA; gzipped if the name ends with .gz
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Directory for per-genome scaffold map files (created if absent)
    #[arg(value_name = "MAP_DIR")]
    pub map_dir: PathBuf,

    /// Haplotype ID embedded in every rewritten header
    #[arg(long = "haplo-id", value_name = "ID", default_value = "1")]
    pub haplo_id: String,

    /// Delimiter between sample, haplotype, and scaffold name
    #[arg(long = "delim", value_name = "CHAR", default_value = "#")]
    pub delim: String,
}

/// Parse the genome list: blank lines, comments, and lines with fewer
/// than two fields are skipped.
pub fn read_genome_list(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    require_input(path)?;
    let f = File::open(path)
        .with_context(|| format!("Failed to open genome list: {}", path.display()))?;
    let mut genomes = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        if let (Some(name), Some(fasta)) = (parts.next(), parts.next()) {
            let fasta = fasta.trim();
            if !fasta.is_empty() {
                genomes.push((name.to_string(), PathBuf::from(fasta)));
            }
        }
    }
    Ok(genomes)
}

/// Scaffold map filename stem: the input's basename with `.gz` and the
/// FASTA extension stripped.
fn map_stem(path: &Path) -> String {
    let mut name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    for ext in [".gz", ".fasta", ".fa", ".fna"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            name = stripped.to_string();
        }
    }
    name
}

pub fn run(args: MergeArgs) -> Result<()> {
    let genomes = read_genome_list(&args.genome_list)?;
    if genomes.is_empty() {
        return Err(anyhow!(
            "No genomes listed in {}",
            args.genome_list.display()
        ));
    }

    // Validate every input up front so a missing genome aborts the run
    // before any output is written.
    for (_, fasta) in &genomes {
        require_input(fasta)?;
    }

    if args.output.exists() {
        warn!("output exists, skipping run: {}", args.output.display());
        return Ok(());
    }

    info!("adding {} genomes to the pangenome", genomes.len());
    fs::create_dir_all(&args.map_dir)
        .with_context(|| format!("Failed to create map dir: {}", args.map_dir.display()))?;

    let pattern = ChromPattern::default();
    let mut out = open_writer(&args.output)?;
    let mut total = 0usize;

    for (sample, fasta) in &genomes {
        info!("reading {}", fasta.display());
        let map_path = args.map_dir.join(format!("{}.txt", map_stem(fasta)));
        let map_file = File::create(&map_path)
            .with_context(|| format!("Failed to create scaffold map: {}", map_path.display()))?;
        let mut map_out = BufWriter::new(map_file);

        for record in FastaReader::new(open_reader(fasta)?) {
            let record = record?;
            let id = pattern.tokenize(&record.header)?.id;
            let new_id = format!(
                "{sample}{delim}{hap}{delim}{id}",
                delim = args.delim,
                hap = args.haplo_id
            );
            writeln!(map_out, "{}\t{}", id, new_id)?;
            write_record(&mut out, &new_id, &record.body)?;
            total += 1;
        }
        map_out.flush()?;
        info!("scaffold map saved: {}", map_path.display());
    }
    out.flush()?;

    info!(
        "merged {} sequences into {}",
        total,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn genome_list_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(&list, "# comment\nsampleA a.fa\n\nlonely\nsampleB  /data/b.fasta.gz\n")
            .unwrap();
        let genomes = read_genome_list(&list).unwrap();
        assert_eq!(genomes.len(), 2);
        assert_eq!(genomes[0].0, "sampleA");
        assert_eq!(genomes[1].1, PathBuf::from("/data/b.fasta.gz"));
    }

    #[test]
    fn map_stem_strips_gz_and_fasta_suffixes() {
        assert_eq!(map_stem(Path::new("/x/genome.fasta.gz")), "genome");
        assert_eq!(map_stem(Path::new("genome.fa")), "genome");
        assert_eq!(map_stem(Path::new("genome.fna")), "genome");
        assert_eq!(map_stem(Path::new("genome.txt")), "genome.txt");
    }

    #[test]
    fn merge_rewrites_headers_and_writes_maps() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("sampA.fa");
        let b = dir.path().join("sampB.fa");
        fs::write(&a, ">scaf1 some description\nACGT\n>scaf2\nTTTT\n").unwrap();
        fs::write(&b, ">scaf1\nGGGG\n").unwrap();

        let list = dir.path().join("genomes.txt");
        fs::write(
            &list,
            format!("alpha {}\nbeta {}\n", a.display(), b.display()),
        )
        .unwrap();

        let out = dir.path().join("pan.fa");
        let maps = dir.path().join("maps");
        run(MergeArgs {
            genome_list: list,
            output: out.clone(),
            map_dir: maps.clone(),
            haplo_id: "1".into(),
            delim: "#".into(),
        })
        .unwrap();

        let merged = fs::read_to_string(&out).unwrap();
        assert_eq!(
            merged,
            ">alpha#1#scaf1\nACGT\n>alpha#1#scaf2\nTTTT\n>beta#1#scaf1\nGGGG\n"
        );
        let map_a = fs::read_to_string(maps.join("sampA.txt")).unwrap();
        assert_eq!(map_a, "scaf1\talpha#1#scaf1\nscaf2\talpha#1#scaf2\n");
        let map_b = fs::read_to_string(maps.join("sampB.txt")).unwrap();
        assert_eq!(map_b, "scaf1\tbeta#1#scaf1\n");
    }

    #[test]
    fn custom_haplotype_and_delimiter() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("s.fa");
        fs::write(&a, ">scaf1\nAC\n").unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(&list, format!("samp {}\n", a.display())).unwrap();

        let out = dir.path().join("pan.fa");
        run(MergeArgs {
            genome_list: list,
            output: out.clone(),
            map_dir: dir.path().join("maps"),
            haplo_id: "2".into(),
            delim: ":".into(),
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), ">samp:2:scaf1\nAC\n");
    }

    #[test]
    fn missing_genome_aborts_before_any_output() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("present.fa");
        fs::write(&a, ">scaf1\nAC\n").unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(
            &list,
            format!("samp {}\nghost {}/missing.fa\n", a.display(), dir.path().display()),
        )
        .unwrap();

        let out = dir.path().join("pan.fa");
        let maps = dir.path().join("maps");
        let res = run(MergeArgs {
            genome_list: list,
            output: out.clone(),
            map_dir: maps.clone(),
            haplo_id: "1".into(),
            delim: "#".into(),
        });
        assert!(res.is_err());
        assert!(!out.exists());
        assert!(!maps.exists());
    }

    #[test]
    fn existing_output_is_left_alone() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("s.fa");
        fs::write(&a, ">scaf1\nAC\n").unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(&list, format!("samp {}\n", a.display())).unwrap();
        let out = dir.path().join("pan.fa");
        fs::write(&out, "sentinel").unwrap();

        run(MergeArgs {
            genome_list: list,
            output: out.clone(),
            map_dir: dir.path().join("maps"),
            haplo_id: "1".into(),
            delim: "#".into(),
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "sentinel");
    }
}
