//! External command execution
//!
//! This module provides:
//! - The `Command` description and `CommandRunner` trait used by every pipeline step
//! - `ProcessRunner`, which spawns real child processes and streams their output

pub mod command;

pub use command::{Command, CommandOutput, CommandRunner, ProcessRunner};
