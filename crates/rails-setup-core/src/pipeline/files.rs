//! Generated file contents and small file helpers used by the scaffold pipeline

use crate::config::AppName;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// A commented pattern appended to `.gitignore`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreRule {
    pub comment: &'static str,
    pub pattern: &'static str,
}

/// Rules added to every scaffolded app
pub const SCAFFOLD_IGNORE_RULES: [IgnoreRule; 3] = [
    IgnoreRule {
        comment: "Ignore database.yml file",
        pattern: "config/database.yml",
    },
    IgnoreRule {
        comment: "Ignore precompiled assets",
        pattern: "public/assets",
    },
    IgnoreRule {
        comment: "Ignore machine-specific settings",
        pattern: "config/settings.local.yml",
    },
];

/// Text appended to `.gitignore`: a blank line, the comment, then the pattern
pub fn ignore_block(rules: &[IgnoreRule]) -> String {
    rules
        .iter()
        .map(|rule| format!("\n# {}\n{}\n", rule.comment, rule.pattern))
        .collect()
}

/// README for a fresh app: title, underline, tagline
pub fn readme(app_name: &AppName) -> String {
    format!(
        "{}\n{}\n\nA brand new sweet Rails app :)\n",
        app_name.title(),
        "=".repeat(app_name.as_str().chars().count())
    )
}

/// Appended to `config/initializers/rails_config.rb`; refuses to boot without local config
pub const ENVIRONMENT_CHECK: &str = r##"

# Checks for the presence of database.yml
if !File.exist?("#{Rails.root}/config/database.yml")
  abort "ERROR: database.yml missing.  Please copy config/database.template.yml to config/database.yml and configure it for your machine."
end

# Check for a local.yml file
if !File.exist?("#{Rails.root}/config/settings.local.yml")
  abort "ERROR: local.yml missing.  Please copy config/settings.local.template.yml to config/settings.local.yml and configure it for your machine."
end
"##;

/// `config/initializers/secret_token.rb`
pub const SECRET_TOKEN_INITIALIZER: &str = r#"# Be sure to restart your server when you modify this file.

# Your secret key for verifying the integrity of signed cookies.
# If you change this key, all old signed cookies will become invalid!
# Make sure the secret is at least 30 characters and all random,
# no regular words or you'll be exposed to dictionary attacks.
secret_token = Settings.secret_token
abort "ERROR: No secret token provided.  Please assign a random secret_token to local.yml." if secret_token.blank?
Rails.application.config.secret_token = secret_token
"#;

/// `config/settings.local.template.yml`
pub const LOCAL_SETTINGS_TEMPLATE: &str = r#"# Version: 1
# Contains local settings that must be modified for each machine

# IMPORTANT: You need to copy the contents of this file to local.yml and customize accordingly

# Replace with something very random and very long (min 30 chars)
# Try https://www.grc.com/passwords.htm
secret_token: ~
"#;

/// Stylesheet folders created for bourbon
pub const STYLESHEET_FOLDERS: [&str; 3] = ["base", "components", "modules"];

/// Empty partials created under `base/`
pub const BASE_PARTIALS: [&str; 3] = ["body", "layout", "typography"];

const STYLESHEET_IMPORTS: &str = r#"
@import "bourbon";
@import "normalize";
@import "base/body";
@import "base/layout";
@import "base/typography";
"#;

/// Turn the generated `application.css` into the bourbon-based `application.css.scss`.
///
/// The `*= require_tree .` directive is dropped since every partial is now
/// imported explicitly.
pub fn rewrite_application_stylesheet(css: &str) -> String {
    let mut scss: String = css
        .split_inclusive('\n')
        .filter(|line| line.trim() != "*= require_tree .")
        .collect();
    scss.push_str(STYLESHEET_IMPORTS);
    scss
}

/// Append `content` to `path`, creating the file if needed
pub async fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(content.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.flush()
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write `content` to `path`, replacing any existing file
pub async fn write(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Create `path` empty if it does not exist
pub async fn touch(path: &Path) -> Result<()> {
    append(path, "").await
}
