//! configure - Configure an existing Rails app for development or production

use anyhow::{Context, Result};
use clap::Parser;
use rails_setup_core::cli::{failure_exit, parse_error_exit, timeout_from_secs};
use rails_setup_core::{ClackReporter, ConfigureOptions, Configurer, ProcessRunner, Toolchain};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "configure")]
#[command(about = "Configure an existing Rails app for development or production")]
#[command(version)]
pub struct Args {
    /// Set the app up for production
    #[arg(short, long)]
    pub production: bool,

    /// App directory (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// YAML file overriding the rails/bundle/gem/rake/git program names
    #[arg(long)]
    pub toolchain: Option<PathBuf>,

    /// Kill any command running longer than this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Args {
    fn into_options(self) -> Result<ConfigureOptions> {
        let project_dir = match self.directory {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        Ok(ConfigureOptions::new(project_dir, self.production))
    }
}

async fn run(args: Args) -> Result<()> {
    let toolchain = Toolchain::load(args.toolchain.as_deref())?;
    let runner = ProcessRunner::new().with_timeout(timeout_from_secs(args.timeout));
    let options = args.into_options()?;

    Configurer::new(&options, &toolchain, &runner, &ClackReporter)
        .run()
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return parse_error_exit(err),
    };

    let environment = if args.production {
        "production"
    } else {
        "development"
    };
    ClackReporter::intro(&format!("configure ({})", environment));

    match run(args).await {
        Ok(()) => {
            ClackReporter::outro("Configuration complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            ClackReporter::outro_cancel(&format!("{:#}", err));
            failure_exit(&err)
        }
    }
}
