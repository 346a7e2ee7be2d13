use log::debug;
use log::info;
use std::process::Command;
use anyhow::bail;

/// Check that an external program can be started. Some tools exit non-zero
/// when called without arguments, so only a failure to spawn counts
pub fn check_software(program: &str) -> anyhow::Result<()> {
    debug!("Checking for {}", program);
    if let Ok(_output) = Command::new(program).arg("-version").output() {
        info!("Found {}", program);
        Ok(())
    } else {
        bail!("{} is either not installed or not in PATH", program)
    }
}

pub fn check_makeblastdb() -> anyhow::Result<()> {
    check_software("makeblastdb")
}

pub fn check_blastn() -> anyhow::Result<()> {
    check_software("blastn")
}

pub fn check_curl() -> anyhow::Result<()> {
    check_software("curl")
}
