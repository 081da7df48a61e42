//! Per-run options for the scaffold and configure pipelines

use crate::error::ScaffoldError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Gemfile line new gems are inserted after
pub const DEFAULT_GEM_ANCHOR: &str = "gem 'sqlite3'";

/// CSS reset vendored by the bourbon option
pub const NORMALIZE_CSS_URL: &str =
    "https://necolas.github.io/normalize.css/2.1.1/normalize.css";

/// Environment variable for overriding the normalize.css URL
pub const NORMALIZE_URL_ENV: &str = "RAILS_SETUP_NORMALIZE_URL";

/// A validated application name
///
/// The name becomes both a directory and a command argument, so it must start
/// with an ASCII letter or digit and contain only letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName(String);

impl AppName {
    pub fn parse(raw: &str) -> Result<Self, ScaffoldError> {
        let mut chars = raw.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid_start && valid_rest {
            Ok(Self(raw.to_string()))
        } else {
            Err(ScaffoldError::InvalidArgument(format!(
                "Invalid app name '{}': use letters, digits, '_' or '-', starting with a letter or digit",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First letter upper-cased, the rest lower-cased (`myApp` -> `Myapp`)
    pub fn title(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

impl FromStr for AppName {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options for creating a new application
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub app_name: AppName,
    /// Directory the application directory is created in
    pub parent_dir: PathBuf,
    /// Install bourbon and set up the stylesheet skeleton
    pub bourbon: bool,
    pub gem_anchor: String,
    pub normalize_url: String,
}

impl ScaffoldOptions {
    pub fn new(app_name: AppName, parent_dir: impl AsRef<Path>) -> Self {
        Self {
            app_name,
            parent_dir: parent_dir.as_ref().to_path_buf(),
            bourbon: false,
            gem_anchor: DEFAULT_GEM_ANCHOR.to_string(),
            normalize_url: NORMALIZE_CSS_URL.to_string(),
        }
    }

    /// Replace the normalize.css URL with `RAILS_SETUP_NORMALIZE_URL` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(NORMALIZE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.normalize_url = url;
        }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.parent_dir.join(self.app_name.as_str())
    }
}

/// Options for configuring an existing application
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    pub project_dir: PathBuf,
    pub production: bool,
}

impl ConfigureOptions {
    pub fn new(project_dir: impl AsRef<Path>, production: bool) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            production,
        }
    }
}
