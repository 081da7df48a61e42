//! Exit handling shared by the binaries

use crate::error::{exit_code_for, EXIT_USAGE};
use clap::error::ErrorKind;
use std::process::ExitCode;
use std::time::Duration;

/// Print a clap parse error and pick the exit status.
///
/// `--help` and `--version` exit 0; any real argument problem exits with
/// `EX_USAGE` (64) rather than clap's default of 2.
pub fn parse_error_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    ExitCode::from(parse_error_code(&err))
}

/// Exit status for a clap parse error
pub fn parse_error_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}

/// Exit status for a pipeline error
pub fn failure_exit(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_code_for(err))
}

/// `--timeout <secs>` as a duration; zero means no limit
pub fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}
