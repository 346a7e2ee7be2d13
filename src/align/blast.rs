use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use serde::Deserialize;

use super::Reference;
use crate::runtime::{Error, Result};
use crate::utils;

/// Tabular output columns requested from blastn, in order
pub const BLAST_OUTFMT: &str = "6 qseqid sseqid pident length qstart qend sstart send evalue bitscore";

///////////////////////////////
/// One row of tabular alignment output. Coordinates are 1-based and inclusive
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignmentHit {
    pub qseqid: String,
    pub sseqid: String,
    pub pident: f64,
    pub length: usize,
    pub qstart: usize,
    pub qend: usize,
    pub sstart: usize,
    pub send: usize,
    pub evalue: f64,
    pub bitscore: f64,
}

impl AlignmentHit {
    /// Subject coordinates run forward, i.e. the query matched the gene in sense
    pub fn is_plus_strand(&self) -> bool {
        self.sstart <= self.send
    }
}

///////////////////////////////
/// Anything that can index a reference and align query sequences to it
pub trait Aligner {
    /// Build a searchable database; returns the handle passed to `align`
    fn build_database(&self, reference: &Reference, workdir: &Path) -> Result<PathBuf>;

    /// Align every sequence of a FASTA file against the database
    fn align(&self, path_query: &Path, database: &Path, workdir: &Path) -> Result<Vec<AlignmentHit>>;
}

///////////////////////////////
/// NCBI BLAST+ through makeblastdb and blastn
#[derive(Debug, Clone, Default)]
pub struct BlastAligner {}

impl BlastAligner {
    pub fn new() -> anyhow::Result<Self> {
        utils::check_makeblastdb()?;
        utils::check_blastn()?;
        Ok(BlastAligner {})
    }
}

impl Aligner for BlastAligner {
    fn build_database(&self, reference: &Reference, workdir: &Path) -> Result<PathBuf> {
        let path_fasta = reference.materialize(workdir)?;
        let path_db = workdir.join("db");

        info!("Making database from {}", path_fasta.display());
        utils::run_utility(
            Command::new("makeblastdb")
                .arg("-in")
                .arg(&path_fasta)
                .arg("-dbtype")
                .arg("nucl")
                .arg("-out")
                .arg(&path_db),
        )?;
        Ok(path_db)
    }

    fn align(&self, path_query: &Path, database: &Path, workdir: &Path) -> Result<Vec<AlignmentHit>> {
        let path_hits = workdir.join("hits.tsv");
        utils::run_utility(
            Command::new("blastn")
                .arg("-query")
                .arg(path_query)
                .arg("-db")
                .arg(database)
                .arg("-strand")
                .arg("plus")
                .arg("-outfmt")
                .arg(BLAST_OUTFMT)
                .arg("-out")
                .arg(&path_hits),
        )?;

        let file = File::open(&path_hits).map_err(|_| Error::file_not_found(&path_hits))?;
        let hits = parse_tabular_hits(file)?;
        debug!("blastn reported {} hits", hits.len());
        Ok(hits)
    }
}

/// Parse tab separated hits in BLAST_OUTFMT column order
pub fn parse_tabular_hits(src: impl Read) -> Result<Vec<AlignmentHit>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .from_reader(src);

    let mut hits = Vec::new();
    for result in reader.deserialize() {
        let hit: AlignmentHit =
            result.map_err(|e| Error::parse_error("alignment output", Some(e.to_string())))?;
        hits.push(hit);
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_outfmt6() {
        let src = "read1\tACTB\t100.000\t30\t1\t30\t1501\t1530\t1e-10\t56.5\n\
                   read2\tGAPDH\t96.667\t30\t3\t32\t10\t39\t2.3e-8\t49.1\n";
        let hits = parse_tabular_hits(src.as_bytes()).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].qseqid, "read1");
        assert_eq!(hits[0].send, 1530);
        assert_eq!(hits[1].sseqid, "GAPDH");
        assert_eq!(hits[1].qend, 32);
        assert!((hits[1].bitscore - 49.1).abs() < 1e-9);
    }

    #[test]
    fn strand_from_subject_coordinates() {
        let src = "r\tG\t100\t8\t1\t8\t501\t508\t1e-3\t16\n\
                   r\tG\t100\t8\t1\t8\t508\t501\t1e-3\t16\n";
        let hits = parse_tabular_hits(src.as_bytes()).unwrap();
        assert!(hits[0].is_plus_strand());
        assert!(!hits[1].is_plus_strand());
    }

    #[test]
    fn empty_output_is_no_hits() {
        assert!(parse_tabular_hits("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_row_rejected() {
        let src = "read1\tACTB\tnot-a-number\t30\t1\t30\t1\t30\t1e-10\t56.5\n";
        assert!(matches!(
            parse_tabular_hits(src.as_bytes()),
            Err(Error::ParseError { .. })
        ));
    }
}
