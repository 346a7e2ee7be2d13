use thiserror::Error;

use crate::common::{ReadEnd, WhichRead};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File at {:?} not found.", path)]
    FileNotFound { path: std::path::PathBuf },

    #[error("File at {:?} is invalid{}.", path, Error::format_msg_as_detail(msg))]
    FileNotValid {
        path: std::path::PathBuf,
        msg: Option<String>,
    },

    #[error("Failed reading FASTQ record {} in {:?} ({})", record, path, source)]
    FastqParse {
        path: std::path::PathBuf,
        record: usize,
        #[source]
        source: seq_io::fastq::Error,
    },

    #[error(
        "Read files are not paired: read 1 has {} records but read 2 has {}",
        read1_count,
        read2_count
    )]
    UnpairedReads {
        read1_count: usize,
        read2_count: usize,
    },

    #[error(
        "Cannot trim {} bases from the {} end of {}; only {} bases remain",
        requested,
        end,
        read,
        available
    )]
    TrimOverflow {
        read: WhichRead,
        end: ReadEnd,
        requested: usize,
        available: usize,
    },

    #[error("Manifest {:?} has unsupported file type; expected .csv, .tsv or a spreadsheet (.xlsx, .xls, .ods)", path)]
    UnsupportedManifestFormat { path: std::path::PathBuf },

    #[error("Manifest row {} is invalid{}", row, Error::format_msg_as_detail(msg))]
    ManifestRow { row: usize, msg: Option<String> },

    #[error(
        "Utility '{}' failed on execute \'{}\'{}",
        utility,
        cmd,
        Error::format_msg_as_detail(msg)
    )]
    UtilityExecutionError {
        utility: String,
        cmd: String,
        msg: Option<String>,
    },

    #[error(
        "Failed trying to execute utility '{utility}'. Make sure it is in your $PATH and you have execution permissions."
    )]
    UtilityNotExecutable { utility: String },

    #[error("Failed parsing {}{}", context, Error::format_msg_as_detail(msg))]
    ParseError {
        context: String,
        msg: Option<String>,
    },

    #[error("I/O error on {:?}: {}", path, source)]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[cold]
    pub fn file_not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn file_not_valid<P: AsRef<std::path::Path>, M: Into<String>>(
        path: P,
        msg: Option<M>,
    ) -> Self {
        Error::FileNotValid {
            path: path.as_ref().to_path_buf(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn manifest_row<M: Into<String>>(row: usize, msg: Option<M>) -> Self {
        Error::ManifestRow {
            row,
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn utility_execution_error<U: Into<String>, C: Into<String>, M: Into<String>>(
        utility: U,
        cmd: C,
        msg: Option<M>,
    ) -> Self {
        Error::UtilityExecutionError {
            utility: utility.into(),
            cmd: cmd.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn utility_not_executable<U: Into<String>>(utility: U) -> Self {
        Error::UtilityNotExecutable {
            utility: utility.into(),
        }
    }

    #[cold]
    pub fn parse_error<C: Into<String>, M: Into<String>>(context: C, msg: Option<M>) -> Self {
        Error::ParseError {
            context: context.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_appended_only_when_present() {
        let e = Error::manifest_row(3, Some("missing column 4"));
        assert_eq!(e.to_string(), "Manifest row 3 is invalid (missing column 4)");

        let e = Error::manifest_row::<String>(3, None);
        assert_eq!(e.to_string(), "Manifest row 3 is invalid");
    }

    #[test]
    fn trim_overflow_names_read_and_end() {
        let e = Error::TrimOverflow {
            read: WhichRead::Read1,
            end: ReadEnd::ThreePrime,
            requested: 12,
            available: 8,
        };
        assert_eq!(
            e.to_string(),
            "Cannot trim 12 bases from the 3' end of read 1; only 8 bases remain"
        );
    }
}
