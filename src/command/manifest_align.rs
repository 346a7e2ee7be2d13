use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};

use crate::align::{build_tails, write_query_fasta, write_tails_csv, Aligner, Reference};
use crate::experiment::Experiment;
use crate::manifest::Manifest;
use crate::umi::{DedupParams, DedupStats};

pub struct ManifestAlignParams {
    pub path_r1: PathBuf,
    pub path_r2: PathBuf,
    pub path_manifest: PathBuf,

    pub reference: Reference,

    /// Random-mer already removed upstream; only strip barcodes
    pub trimmed: bool,
    pub max_hamming: u32,
    pub ligation_bases: usize,

    /// Scratch directory; must exist
    pub path_tmp: PathBuf,
}

/// What happened to one manifest entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub id: String,
    pub stats: DedupStats,
    /// None if no read pairs survived
    pub path_tails: Option<PathBuf>,
}

///////////////////////////////
/// Per manifest entry: dedup and trim, align read 1 to the reference, write the tails
pub struct ManifestAlign {}
impl ManifestAlign {
    /// Returns one outcome per manifest entry, in manifest order
    pub fn run(params: &ManifestAlignParams, aligner: &dyn Aligner) -> anyhow::Result<Vec<EntryOutcome>> {
        let experiment = Experiment::from_paired_fastq(&params.path_r1, &params.path_r2)
            .context("Failed to read input reads")?;
        let manifest = Manifest::from_path(&params.path_manifest)
            .context("Failed to read manifest")?;

        info!("Making database");
        let database = aligner
            .build_database(&params.reference, &params.path_tmp)
            .context("Failed to build alignment database")?;

        let path_query = params.path_tmp.join("query.fasta");
        let mut outcomes = Vec::new();

        for entry in &manifest {
            let dedup = DedupParams::new(entry.random_mer_length)
                .with_max_hamming(params.max_hamming)
                .with_ligation_bases(params.ligation_bases);

            let (processed, stats) = if params.trimmed {
                experiment.trim_barcode_only(&entry.barcode, &dedup)
            } else {
                experiment.deduplicate_and_trim(&entry.barcode, &dedup)
            };
            info!("{}: {}", entry.id, stats);

            if processed.is_empty() {
                warn!("Nothing found for {}", entry.id);
                outcomes.push(EntryOutcome {
                    id: entry.id.clone(),
                    stats,
                    path_tails: None,
                });
                continue;
            }

            info!("Aligning {} read pairs for {}", processed.len(), entry.id);
            let queries = write_query_fasta(&processed, &path_query)?;
            let hits = aligner
                .align(&path_query, &database, &params.path_tmp)
                .with_context(|| format!("Alignment failed for {}", entry.id))?;

            let (tails, unaligned) = build_tails(&queries, &hits);
            if unaligned > 0 {
                info!("{}: {} of {} reads did not align", entry.id, unaligned, queries.len());
            }

            let path_tails = tails_path(&params.path_r1, &entry.id);
            write_tails_csv(&path_tails, &tails)?;
            outcomes.push(EntryOutcome {
                id: entry.id.clone(),
                stats,
                path_tails: Some(path_tails),
            });
        }

        Ok(outcomes)
    }
}

/// Read 1 path without its last extension, then the sample ID: `run_R1.fastq` + `S1` -> `run_R1S1_tails.csv`
pub fn tails_path(path_r1: &Path, id: &str) -> PathBuf {
    let mut s = path_r1.with_extension("").into_os_string();
    s.push(format!("{}_tails.csv", id));
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tails_named_after_read1() {
        assert_eq!(
            tails_path(Path::new("/data/run_R1.fastq"), "S1"),
            PathBuf::from("/data/run_R1S1_tails.csv")
        );
        assert_eq!(
            tails_path(Path::new("run_R1.fastq.gz"), "S2"),
            PathBuf::from("run_R1.fastqS2_tails.csv")
        );
    }
}
