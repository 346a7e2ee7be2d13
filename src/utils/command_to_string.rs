use std::process::{Command, Output};

use itertools::Itertools;
use log::debug;

use crate::runtime::{Error, Result};

pub fn command_to_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args = cmd.get_args().map(|arg| arg.to_string_lossy()).join(" ");
    format!("{} {}", program, args)
}

/// Run to completion. Failure to start and a non-zero exit are both errors;
/// stderr goes into the message
pub fn run_utility(cmd: &mut Command) -> Result<Output> {
    let utility = cmd.get_program().to_string_lossy().to_string();
    debug!("Running: {}", command_to_string(cmd));

    let out = cmd
        .output()
        .map_err(|_| Error::utility_not_executable(utility.clone()))?;

    if out.status.success() {
        Ok(out)
    } else {
        let msg = format!(
            "error code: {:?}: {}",
            out.status.code(),
            String::from_utf8_lossy(&out.stderr).trim()
        );
        Err(Error::utility_execution_error(
            utility,
            command_to_string(cmd),
            Some(msg),
        ))
    }
}
