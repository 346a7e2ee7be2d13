use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::command::breakdown::Breakdown;
use crate::command::breakdown::BreakdownParams;
use crate::common::{DEFAULT_LIGATION_BASES, DEFAULT_MAX_HAMMING};
use crate::fileformat::verify_input_fq_file;
use crate::umi::DedupParams;

#[derive(Args)]
pub struct BreakdownCMD {
    #[arg(long = "r1", visible_alias = "read1", value_parser)]  /// Read 1 FASTQ, optionally compressed
    pub path_r1: PathBuf,

    #[arg(long = "r2", visible_alias = "read2", value_parser)]  /// Read 2 FASTQ, optionally compressed
    pub path_r2: PathBuf,

    #[arg(short = 'b', long)]  /// Barcode plus gene-specific portion, no common adapter
    pub barcode: String,

    #[arg(short = 'r', long = "ranmerlen", value_parser = clap::value_parser!(usize))]  /// Length of the random-mer, 10 or 11
    pub random_mer_length: usize,

    #[arg(long, value_parser = clap::value_parser!(u32), default_value_t = DEFAULT_MAX_HAMMING)]
    pub max_hamming: u32,

    #[arg(long, value_parser = clap::value_parser!(usize), default_value_t = DEFAULT_LIGATION_BASES)]
    pub ligation_bases: usize,

    #[arg(long)]  /// Keep read 1 5' intact instead of removing the barcode length from it
    pub no_defensive_trim: bool,

    #[arg(long = "stats", value_parser)]  /// Optional CSV file with dedup counters
    pub path_stats: Option<PathBuf>,
}

impl BreakdownCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        if self.random_mer_length == 0 {
            anyhow::bail!("Random-mer length must be at least 1");
        }
        verify_input_fq_file(&self.path_r1)?;
        verify_input_fq_file(&self.path_r2)?;
        if self.barcode.trim().is_empty() {
            anyhow::bail!("Barcode must not be empty");
        }

        let dedup = DedupParams::new(self.random_mer_length)
            .with_max_hamming(self.max_hamming)
            .with_ligation_bases(self.ligation_bases)
            .with_defensive_trim(!self.no_defensive_trim);

        Breakdown::run(&BreakdownParams {
            path_r1: self.path_r1.clone(),
            path_r2: self.path_r2.clone(),
            barcode: self.barcode.trim().as_bytes().to_vec(),
            dedup,
            path_stats: self.path_stats.clone(),
        })?;

        log::info!("Breakdown has finished succesfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_random_mer_length_rejected() {
        let mut cmd = BreakdownCMD {
            path_r1: PathBuf::from("r1.fastq"),
            path_r2: PathBuf::from("r2.fastq"),
            barcode: "AAAA".to_string(),
            random_mer_length: 0,
            max_hamming: DEFAULT_MAX_HAMMING,
            ligation_bases: DEFAULT_LIGATION_BASES,
            no_defensive_trim: false,
            path_stats: None,
        };
        let e = cmd.try_execute().unwrap_err();
        assert!(e.to_string().contains("Random-mer length"));
    }

    #[test]
    fn defensive_trim_flag_documented() {
        use clap::{CommandFactory, Parser};

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: BreakdownCMD,
        }

        let cmd = Wrapper::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "no_defensive_trim")
            .unwrap();
        assert!(arg.get_help().is_some());
    }
}
