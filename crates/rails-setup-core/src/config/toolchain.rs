//! Names of the external programs the pipelines shell out to

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// External programs used by the pipelines
///
/// Defaults are the bare program names resolved through `PATH`. A YAML file
/// can replace any of them, and `RAILS_SETUP_<NAME>` environment variables
/// take precedence over both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub rails: String,
    pub bundle: String,
    pub gem: String,
    pub rake: String,
    pub git: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            rails: "rails".to_string(),
            bundle: "bundle".to_string(),
            gem: "gem".to_string(),
            rake: "rake".to_string(),
            git: "git".to_string(),
        }
    }
}

impl Toolchain {
    /// Load the toolchain from an optional YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut toolchain = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        toolchain.apply_overrides(|key| std::env::var(key).ok());
        Ok(toolchain)
    }

    /// Read a toolchain YAML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse toolchain file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Replace program names with values from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots: [(&str, &mut String); 5] = [
            ("RAILS_SETUP_RAILS", &mut self.rails),
            ("RAILS_SETUP_BUNDLE", &mut self.bundle),
            ("RAILS_SETUP_GEM", &mut self.gem),
            ("RAILS_SETUP_RAKE", &mut self.rake),
            ("RAILS_SETUP_GIT", &mut self.git),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }
}
