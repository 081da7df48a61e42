//! Seeding real config files from their committed templates

use super::secret::{generate_secret, SECRET_TOKEN_BYTES};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Placeholder left in committed templates where the secret token goes
pub const SECRET_TOKEN_PLACEHOLDER: &str = "secret_token: ~";

/// Suffix that marks a file as a template for its non-template counterpart
pub const TEMPLATE_SUFFIX: &str = ".template.yml";

/// Literal replacement applied to the first placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub placeholder: String,
    pub value: String,
}

impl Substitution {
    pub fn new(placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: value.into(),
        }
    }

    /// `secret_token: ~` replaced by a freshly generated quoted token
    pub fn secret_token() -> Self {
        Self::new(
            SECRET_TOKEN_PLACEHOLDER,
            format!("secret_token: '{}'", generate_secret(SECRET_TOKEN_BYTES)),
        )
    }
}

/// Apply a substitution to the first occurrence of its placeholder only
pub fn render(template: &str, substitution: Option<&Substitution>) -> String {
    match substitution {
        Some(sub) => template.replacen(&sub.placeholder, &sub.value, 1),
        None => template.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub copied: bool,
}

/// Copy `template` to `target` unless the target already exists.
///
/// A missing template is not an error; nothing is written and `copied` is false.
pub async fn seed(
    template: &Path,
    target: &Path,
    substitution: Option<&Substitution>,
) -> Result<SeedResult> {
    if fs::try_exists(target)
        .await
        .with_context(|| format!("Failed to check {}", target.display()))?
    {
        return Ok(SeedResult { copied: false });
    }

    if !fs::try_exists(template)
        .await
        .with_context(|| format!("Failed to check {}", template.display()))?
    {
        return Ok(SeedResult { copied: false });
    }

    let content = fs::read_to_string(template)
        .await
        .with_context(|| format!("Failed to read template {}", template.display()))?;

    fs::write(target, render(&content, substitution))
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(SeedResult { copied: true })
}

/// Counterpart of a template path (`config/database.template.yml` -> `config/database.yml`)
pub fn template_target(template: &Path) -> Option<PathBuf> {
    let name = template.file_name()?.to_str()?;
    let stem = name.strip_suffix(TEMPLATE_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(template.with_file_name(format!("{}.yml", stem)))
}

/// All template files below `dir`, sorted by path.
///
/// Symlinks are followed. A missing `dir` yields no templates; any other
/// walk error is returned.
pub fn discover_templates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 && is_not_found(&err) => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to scan {}", dir.display()))
            }
        };
        if entry.file_type().is_file() && template_target(entry.path()).is_some() {
            templates.push(entry.into_path());
        }
    }
    templates.sort();
    Ok(templates)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Outcome of seeding one discovered template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededFile {
    pub template: PathBuf,
    pub target: PathBuf,
    pub copied: bool,
}

/// Seed every template below `dir`.
///
/// Each file gets its own freshly generated secret token if it carries the
/// placeholder; templates without it are copied verbatim.
pub async fn seed_all(dir: &Path) -> Result<Vec<SeededFile>> {
    let mut seeded = Vec::new();
    for template in discover_templates(dir)? {
        let Some(target) = template_target(&template) else {
            continue;
        };
        let result = seed(&template, &target, Some(&Substitution::secret_token())).await?;
        seeded.push(SeededFile {
            template,
            target,
            copied: result.copied,
        });
    }
    Ok(seeded)
}
