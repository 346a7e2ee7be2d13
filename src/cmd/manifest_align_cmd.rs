use anyhow::Result;
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use crate::align::{BlastAligner, Reference};
use crate::command::manifest_align::ManifestAlign;
use crate::command::manifest_align::ManifestAlignParams;
use crate::common::{DEFAULT_LIGATION_BASES, DEFAULT_MAX_HAMMING};
use crate::fileformat::verify_input_fq_file;
use crate::utils::check_curl;

#[derive(Args)]
#[command(group(ArgGroup::new("reference").required(true).args(["ensids", "fasta"])))]
pub struct ManifestAlignCMD {
    #[arg(long = "r1", visible_alias = "read1", value_parser)]  /// Read 1 FASTQ, optionally compressed
    pub path_r1: PathBuf,

    #[arg(long = "r2", visible_alias = "read2", value_parser)]  /// Read 2 FASTQ, optionally compressed
    pub path_r2: PathBuf,

    #[arg(short = 'm', long = "manifest", value_parser)]  /// CSV, TSV or spreadsheet with one sample per row
    pub path_manifest: PathBuf,

    #[arg(short = 'e', long)]  /// Comma separated Ensembl IDs to build the database from
    pub ensids: Option<String>,

    #[arg(short = 'f', long, value_parser)]  /// FASTA to use as reference database
    pub fasta: Option<PathBuf>,

    #[arg(short = 't', long)]  /// Set if the random-mer was already trimmed off
    pub trimmed: bool,

    #[arg(long, value_parser = clap::value_parser!(u32), default_value_t = DEFAULT_MAX_HAMMING)]
    pub max_hamming: u32,

    #[arg(long, value_parser = clap::value_parser!(usize), default_value_t = DEFAULT_LIGATION_BASES)]
    pub ligation_bases: usize,

    // Temp file directory; a fresh one is created and removed if not given
    #[arg(long = "tmp", value_parser = clap::value_parser!(PathBuf))]
    pub path_tmp: Option<PathBuf>,
}

impl ManifestAlignCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        verify_input_fq_file(&self.path_r1)?;
        verify_input_fq_file(&self.path_r2)?;

        let reference = match (&self.ensids, &self.fasta) {
            (Some(ids), _) => {
                check_curl()?;
                Reference::from_ensids(ids)
            }
            (None, Some(fasta)) => Reference::Fasta(fasta.clone()),
            (None, None) => anyhow::bail!("Either --ensids or --fasta must be given"),
        };
        let aligner = BlastAligner::new()?;

        //Held until the end of the run; dropping it removes the directory
        let mut _tempdir = None;
        let path_tmp = match &self.path_tmp {
            Some(p) => {
                std::fs::create_dir_all(p)?;
                p.clone()
            }
            None => {
                let dir = tempfile::tempdir()?;
                let p = dir.path().to_path_buf();
                _tempdir = Some(dir);
                p
            }
        };

        let outcomes = ManifestAlign::run(
            &ManifestAlignParams {
                path_r1: self.path_r1.clone(),
                path_r2: self.path_r2.clone(),
                path_manifest: self.path_manifest.clone(),
                reference,
                trimmed: self.trimmed,
                max_hamming: self.max_hamming,
                ligation_bases: self.ligation_bases,
                path_tmp,
            },
            &aligner,
        )?;

        log::info!(
            "ManifestAlign has finished succesfully, wrote {} tail files",
            outcomes.iter().filter(|o| o.path_tails.is_some()).count()
        );
        Ok(())
    }
}
