use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;

use crate::common::PROCESSED_SUFFIX;
use crate::experiment::Experiment;
use crate::umi::{DedupParams, DedupStats};

pub struct BreakdownParams {
    pub path_r1: PathBuf,
    pub path_r2: PathBuf,

    /// Barcode plus gene-specific portion, as read at the start of read 2
    pub barcode: Vec<u8>,
    pub dedup: DedupParams,

    pub path_stats: Option<PathBuf>,
}

///////////////////////////////
/// Deduplicate and trim one barcode group of a paired FASTQ run
pub struct Breakdown {}
impl Breakdown {
    pub fn run(params: &BreakdownParams) -> anyhow::Result<DedupStats> {
        info!("Reading in files");
        let experiment = Experiment::from_paired_fastq(&params.path_r1, &params.path_r2)
            .context("Failed to read input reads")?;

        info!("Filtering and trimming");
        let (processed, stats) = experiment.deduplicate_and_trim(&params.barcode, &params.dedup);
        if processed.is_empty() {
            log::warn!(
                "No read pairs left for barcode {}",
                String::from_utf8_lossy(&params.barcode)
            );
        }

        let path_out_r1 = processed_path(&params.path_r1);
        let path_out_r2 = processed_path(&params.path_r2);
        info!(
            "Writing to {} and {}",
            path_out_r1.display(),
            path_out_r2.display()
        );
        processed.write_paired_fastq(&path_out_r1, &path_out_r2)?;

        if let Some(path_stats) = &params.path_stats {
            write_stats(path_stats, &stats)?;
        }
        Ok(stats)
    }
}

/// `reads_R1.fastq` -> `reads_R1.fastq.processed.fastq`
pub fn processed_path(path_in: &Path) -> PathBuf {
    let mut s: OsString = path_in.as_os_str().to_owned();
    s.push(PROCESSED_SUFFIX);
    PathBuf::from(s)
}

/// One-row CSV with the counters of the run
pub fn write_stats(path: &Path, stats: &DedupStats) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_path(path)
        .with_context(|| format!("Could not open stats file {}", path.display()))?;
    writer.serialize(stats)?;
    writer.flush()?;
    Ok(())
}
