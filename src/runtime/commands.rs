use std::fmt;

use clap::Subcommand;

use crate::cmd;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Remove PCR duplicates and trim one barcode group; writes *.processed.fastq
    Breakdown(cmd::BreakdownCMD),
    /// Deduplicate every manifest entry, align against a reference and tabulate tails
    ManifestAlign(cmd::ManifestAlignCMD),
}

impl Commands {
    pub fn try_execute(&mut self) -> anyhow::Result<()> {
        match self {
            Commands::Breakdown(cmd) => cmd.try_execute(),
            Commands::ManifestAlign(cmd) => cmd.try_execute(),
        }
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match self {
            Commands::Breakdown(_) => "Breakdown",
            Commands::ManifestAlign(_) => "ManifestAlign",
        };
        write!(f, "{}", cmd)
    }
}
