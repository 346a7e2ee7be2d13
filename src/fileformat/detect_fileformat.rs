use std::fs::File;
use std::path::Path;

use log::warn;

use crate::runtime::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFileformat {
    FASTQ,
    CSV,
    TSV,
    Spreadsheet,
    Other,
}

const COMPRESSION_SUFFIXES: [&str; 5] = ["", ".gz", ".bz2", ".xz", ".zst"];

pub fn detect_fileformat(p: &Path) -> DetectedFileformat {
    let p_string = match p.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return DetectedFileformat::Other,
    };

    let is_fastq = COMPRESSION_SUFFIXES.iter().any(|comp| {
        p_string.ends_with(&format!(".fq{}", comp)) || p_string.ends_with(&format!(".fastq{}", comp))
    });

    if is_fastq {
        DetectedFileformat::FASTQ
    } else if p_string.ends_with(".csv") {
        DetectedFileformat::CSV
    } else if p_string.ends_with(".tsv") {
        DetectedFileformat::TSV
    } else if [".xlsx", ".xlsm", ".xlsb", ".xls", ".ods"]
        .iter()
        .any(|ext| p_string.ends_with(ext))
    {
        DetectedFileformat::Spreadsheet
    } else {
        DetectedFileformat::Other
    }
}

/////// Check that the specified file is a FASTQ file
pub fn verify_input_fq_file(path_in: &Path) -> Result<()> {
    if detect_fileformat(path_in) != DetectedFileformat::FASTQ {
        return Err(Error::file_not_valid(
            path_in,
            Some("input file must be a fastq file (.fastq/.fq, optionally compressed)"),
        ));
    }
    let file = File::open(path_in).map_err(|_| Error::file_not_found(path_in))?;
    if file.metadata().map_err(|e| Error::io(path_in, e))?.len() == 0 {
        warn!("Input file {} is empty", path_in.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_extension() {
        assert_eq!(detect_fileformat(Path::new("a/R1.fastq")), DetectedFileformat::FASTQ);
        assert_eq!(detect_fileformat(Path::new("R1.FQ.GZ")), DetectedFileformat::FASTQ);
        assert_eq!(detect_fileformat(Path::new("manifest.csv")), DetectedFileformat::CSV);
        assert_eq!(detect_fileformat(Path::new("manifest.tsv")), DetectedFileformat::TSV);
        assert_eq!(detect_fileformat(Path::new("m.xlsx")), DetectedFileformat::Spreadsheet);
        assert_eq!(detect_fileformat(Path::new("m.ods")), DetectedFileformat::Spreadsheet);
        assert_eq!(detect_fileformat(Path::new("m.json")), DetectedFileformat::Other);
    }

    #[test]
    fn non_fastq_input_rejected() {
        assert!(matches!(
            verify_input_fq_file(Path::new("reads.bam")),
            Err(Error::FileNotValid { .. })
        ));
    }
}
