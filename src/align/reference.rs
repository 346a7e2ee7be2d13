use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::runtime::{Error, Result};
use crate::utils::run_utility;

const ENSEMBL_REST: &str = "https://rest.ensembl.org";

///////////////////////////////
/// Sequences to align against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Fasta(PathBuf),
    EnsemblIds(Vec<String>),
}

impl Reference {
    /// Comma separated list of Ensembl IDs; blanks are ignored
    pub fn from_ensids(list: &str) -> Self {
        Reference::EnsemblIds(
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    ///////////////////////////////
    /// Get a FASTA file for the reference, downloading into `workdir` if needed
    pub fn materialize(&self, workdir: &Path) -> Result<PathBuf> {
        match self {
            Reference::Fasta(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path));
                }
                Ok(path.clone())
            }
            Reference::EnsemblIds(ids) => {
                if ids.is_empty() {
                    return Err(Error::parse_error("Ensembl ID list", Some("no IDs given")));
                }
                let path_db = workdir.join("db.fa");
                fetch_ensembl(ids, &path_db)?;
                Ok(path_db)
            }
        }
    }
}

pub fn ensembl_url(id: &str) -> String {
    format!(
        "{}/sequence/id/{}?type=genomic;content-type=text/x-fasta",
        ENSEMBL_REST, id
    )
}

/// Concatenate the genomic sequence of every ID into one FASTA file
fn fetch_ensembl(ids: &[String], path_out: &Path) -> Result<()> {
    let mut file = File::create(path_out).map_err(|e| Error::io(path_out, e))?;
    for id in ids {
        info!("Fetching {} from Ensembl", id);
        let out = run_utility(Command::new("curl").arg("-sSf").arg(ensembl_url(id)))?;
        if !out.stdout.starts_with(b">") {
            return Err(Error::parse_error(
                format!("Ensembl response for {}", id),
                Some("not FASTA"),
            ));
        }
        file.write_all(&out.stdout).map_err(|e| Error::io(path_out, e))?;
        if !out.stdout.ends_with(b"\n") {
            file.write_all(b"\n").map_err(|e| Error::io(path_out, e))?;
        }
    }
    file.flush().map_err(|e| Error::io(path_out, e))?;
    Ok(())
}
