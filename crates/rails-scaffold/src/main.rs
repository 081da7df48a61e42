//! scaffold - Create and set up a new Rails app

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use rails_setup_core::cli::{failure_exit, parse_error_exit, timeout_from_secs};
use rails_setup_core::config::{DEFAULT_GEM_ANCHOR, NORMALIZE_CSS_URL, NORMALIZE_URL_ENV};
use rails_setup_core::{
    AppName, ClackReporter, HttpFetcher, ProcessRunner, ScaffoldOptions, Scaffolder, Toolchain,
    USER_AGENT,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Create and set up a new Rails app")]
#[command(version)]
pub struct Args {
    /// Name of the app; also the directory it is created in
    pub appname: AppName,

    /// Install the bourbon gem and a stylesheet skeleton
    #[arg(short, long, overrides_with = "no_bourbon")]
    pub bourbon: bool,

    /// Skip bourbon (default)
    #[arg(long = "no-bourbon", overrides_with = "bourbon")]
    pub no_bourbon: bool,

    /// Directory to create the app in (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Gemfile line new gems are added after
    #[arg(
        long = "gem-anchor",
        default_value = DEFAULT_GEM_ANCHOR,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub gem_anchor: String,

    /// YAML file overriding the rails/bundle/gem/rake/git program names
    #[arg(long)]
    pub toolchain: Option<PathBuf>,

    /// Kill any command or download running longer than this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Args {
    /// Build run options; `lookup` supplies environment overrides
    fn into_options<F>(self, lookup: F) -> Result<ScaffoldOptions>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parent = match self.directory {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let mut options = ScaffoldOptions::new(self.appname, parent);
        options.bourbon = self.bourbon && !self.no_bourbon;
        options.gem_anchor = self.gem_anchor;
        options.apply_overrides(lookup);
        Ok(options)
    }
}

async fn run(args: Args) -> Result<PathBuf> {
    let toolchain = Toolchain::load(args.toolchain.as_deref())?;
    let timeout = timeout_from_secs(args.timeout);
    let options = args.into_options(|key| std::env::var(key).ok())?;

    let runner = ProcessRunner::new().with_timeout(timeout);
    let fetcher = HttpFetcher::new(USER_AGENT, timeout);

    Scaffolder::new(&options, &toolchain, &runner, &fetcher, &ClackReporter)
        .run()
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return parse_error_exit(err),
    };

    ClackReporter::intro("scaffold");

    match run(args).await {
        Ok(app_dir) => {
            ClackReporter::outro(&format!("Your app is ready in {}", app_dir.display()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            ClackReporter::outro_cancel(&format!("{:#}", err));
            failure_exit(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use rails_setup_core::cli::parse_error_code;

    #[test]
    fn test_parse_appname_only() {
        let args = Args::try_parse_from(["scaffold", "blog"]).unwrap();
        assert_eq!(args.appname.as_str(), "blog");
        assert!(!args.bourbon);
        assert_eq!(args.gem_anchor, DEFAULT_GEM_ANCHOR);
    }

    #[test]
    fn test_missing_appname_is_usage_error() {
        let err = Args::try_parse_from(["scaffold"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_error_code(&err), 64);
    }

    #[test]
    fn test_invalid_appname_is_usage_error() {
        let err = Args::try_parse_from(["scaffold", "../oops"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(parse_error_code(&err), 64);
    }

    #[test]
    fn test_bourbon_flags_last_wins() {
        let args = Args::try_parse_from(["scaffold", "blog", "--no-bourbon", "--bourbon"]).unwrap();
        assert!(args.into_options(|_| None).unwrap().bourbon);

        let args = Args::try_parse_from(["scaffold", "blog", "--bourbon", "--no-bourbon"]).unwrap();
        assert!(!args.into_options(|_| None).unwrap().bourbon);
    }

    #[test]
    fn test_directory_sets_parent() {
        let args = Args::try_parse_from(["scaffold", "blog", "-C", "/srv/apps"]).unwrap();
        let options = args.into_options(|_| None).unwrap();
        assert_eq!(options.project_dir(), PathBuf::from("/srv/apps/blog"));
    }

    #[test]
    fn test_empty_gem_anchor_is_usage_error() {
        let err = Args::try_parse_from(["scaffold", "blog", "--gem-anchor", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(parse_error_code(&err), 64);
    }

    #[test]
    fn test_normalize_url_from_lookup() {
        let args = Args::try_parse_from(["scaffold", "blog"]).unwrap();
        let options = args
            .into_options(|key| {
                (key == NORMALIZE_URL_ENV).then(|| "https://mirror.test/normalize.css".to_string())
            })
            .unwrap();
        assert_eq!(options.normalize_url, "https://mirror.test/normalize.css");

        let args = Args::try_parse_from(["scaffold", "blog"]).unwrap();
        assert_eq!(args.into_options(|_| None).unwrap().normalize_url, NORMALIZE_CSS_URL);
    }
}
