//! Rails Setup Core - Shared library for the `scaffold` and `configure` CLIs
//!
//! This library holds everything the two binaries share: running external
//! tools, seeding config files from templates, generating secret tokens and
//! editing the Gemfile, plus the two pipelines built on top of them.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Primitives** - `CommandRunner`, template seeding, secret generation,
//!   Gemfile editing, asset fetching
//! - **Layer 2: Pipelines** - `Scaffolder` and `Configurer`, driven by explicit
//!   options and a `Toolchain`
//! - **Layer 3: Output** - `Reporter` implementations; cliclack-based output is feature-gated
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based reporter
//!
//! # Example Usage
//!
//! ```ignore
//! use rails_setup_core::{ConfigureOptions, Configurer, ConsoleReporter, ProcessRunner, Toolchain};
//!
//! let options = ConfigureOptions::new(".", true);
//! let toolchain = Toolchain::load(None)?;
//! let runner = ProcessRunner::new();
//! Configurer::new(&options, &toolchain, &runner, &ConsoleReporter).run().await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gemfile;
pub mod pipeline;
pub mod remote;
pub mod report;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use config::{AppName, ConfigureOptions, ScaffoldOptions, Toolchain};
pub use error::{exit_code_for, ScaffoldError, EXIT_FAILURE, EXIT_USAGE};
pub use gemfile::GemfileEditor;
pub use pipeline::{Configurer, Scaffolder};
pub use remote::{AssetFetcher, HttpFetcher};
pub use report::{ConsoleReporter, Reporter};
pub use runtime::{Command, CommandOutput, CommandRunner, ProcessRunner};
pub use templates::{generate_secret, seed, SeedResult, Substitution};

#[cfg(feature = "tui")]
pub use tui::ClackReporter;

/// User agent for HTTP requests
pub const USER_AGENT: &str = concat!("rails-setup/", env!("CARGO_PKG_VERSION"));
