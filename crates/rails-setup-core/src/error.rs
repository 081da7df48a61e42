//! Error types shared by the scaffolding primitives

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for command-line usage errors (sysexits `EX_USAGE`)
pub const EXIT_USAGE: u8 = 64;

/// Exit status for every other failure
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Error running command: {command} (exit status {status})")]
    CommandExecution {
        command: String,
        status: i32,
        output: String,
    },

    #[error("Command timed out after {seconds} seconds: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    #[error("Failed to start command: {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to find reference {anchor} in Gemfile")]
    AnchorNotFound { anchor: String },

    #[error("Unable to retrieve version number of gem {name}")]
    VersionLookup { name: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Existing file/directory called {} already exists!", .0.display())]
    TargetExists(PathBuf),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    /// Process exit status a binary should terminate with for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            ScaffoldError::InvalidArgument(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Pick the exit status for an error chain produced by a pipeline.
///
/// The first `ScaffoldError` found in the chain decides; anything else is a
/// generic failure.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ScaffoldError>())
        .map(ScaffoldError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_invalid_argument_maps_to_usage() {
        let err = ScaffoldError::InvalidArgument("missing appname".to_string());
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn test_command_failure_maps_to_one() {
        let err = ScaffoldError::CommandExecution {
            command: "bundle install".to_string(),
            status: 7,
            output: String::new(),
        };
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        assert!(err.to_string().contains("bundle install"));
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let result: Result<(), ScaffoldError> =
            Err(ScaffoldError::InvalidArgument("bad name".to_string()));
        let err = result.context("Failed to scaffold").unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
    }

    #[test]
    fn test_foreign_errors_map_to_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), EXIT_FAILURE);
    }
}
