//! Textual Gemfile editing
//!
//! New gems are inserted on the line after a known anchor (by default the
//! `gem 'sqlite3'` line every generated app has). There is no Gemfile
//! parser; a missing anchor is a hard failure.

use super::version::resolve_version;
use crate::config::Toolchain;
use crate::error::ScaffoldError;
use crate::runtime::{Command, CommandRunner};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Declaration line for a gem pinned with a pessimistic constraint
pub fn declaration(name: &str, version: &str) -> String {
    format!("gem '{}', '~> {}'", name, version)
}

/// Byte offset of `anchor` in `manifest`; an empty anchor never matches
fn find_anchor(manifest: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    manifest.find(anchor)
}

/// Insert a declaration on its own line right after the line holding `anchor`.
///
/// Every other byte of `manifest` is preserved.
pub fn insert_declaration(
    manifest: &str,
    anchor: &str,
    name: &str,
    version: &str,
) -> Result<String, ScaffoldError> {
    let start = find_anchor(manifest, anchor).ok_or_else(|| ScaffoldError::AnchorNotFound {
        anchor: anchor.to_string(),
    })?;
    let anchor_end = start + anchor.len();
    let line_end = manifest[anchor_end..]
        .find('\n')
        .map(|offset| anchor_end + offset)
        .unwrap_or(manifest.len());

    let (insert_at, newline) = if manifest[..line_end].ends_with('\r') {
        (line_end - 1, "\r\n")
    } else {
        (line_end, "\n")
    };

    let mut updated = String::with_capacity(manifest.len() + name.len() + version.len() + 16);
    updated.push_str(&manifest[..insert_at]);
    updated.push_str(newline);
    updated.push_str(&declaration(name, version));
    updated.push_str(&manifest[insert_at..]);
    Ok(updated)
}

/// Adds gems to a project's Gemfile, resolving versions from the gem index
pub struct GemfileEditor<'a, R: CommandRunner> {
    runner: &'a R,
    toolchain: &'a Toolchain,
    project_dir: PathBuf,
}

impl<'a, R: CommandRunner> GemfileEditor<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain, project_dir: &Path) -> Self {
        Self {
            runner,
            toolchain,
            project_dir: project_dir.to_path_buf(),
        }
    }

    pub fn gemfile_path(&self) -> PathBuf {
        self.project_dir.join("Gemfile")
    }

    /// Ask the remote gem index for the newest version of `name`
    pub async fn lookup_version(&self, name: &str) -> Result<String, ScaffoldError> {
        let command = Command::new(&self.toolchain.gem, &self.project_dir)
            .args(["list", name, "--remote"]);
        let listing = self.runner.run(&command).await?;
        resolve_version(&listing.output, name).ok_or_else(|| ScaffoldError::VersionLookup {
            name: name.to_string(),
        })
    }

    /// Return `manifest` with `name` declared after `anchor`, plus the version pinned.
    ///
    /// The anchor is checked before the index is queried.
    pub async fn add_dependency(
        &self,
        manifest: &str,
        name: &str,
        anchor: &str,
    ) -> Result<(String, String), ScaffoldError> {
        if find_anchor(manifest, anchor).is_none() {
            return Err(ScaffoldError::AnchorNotFound {
                anchor: anchor.to_string(),
            });
        }
        let version = self.lookup_version(name).await?;
        let updated = insert_declaration(manifest, anchor, name, &version)?;
        Ok((updated, version))
    }

    /// Add `name` to the Gemfile on disk and optionally run `bundle install`
    pub async fn install_gem(&self, name: &str, anchor: &str, bundle: bool) -> Result<String> {
        let path = self.gemfile_path();
        let manifest = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let (updated, version) = self.add_dependency(&manifest, name, anchor).await?;

        fs::write(&path, updated)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if bundle {
            let install = Command::new(&self.toolchain.bundle, &self.project_dir).arg("install");
            self.runner.run(&install).await?;
        }

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRunner;

    const GEMFILE: &str = "source 'https://rubygems.org'\n\ngem 'rails', '3.2.13'\n\ngem 'sqlite3'\n\ngem 'jquery-rails'\n";

    #[test]
    fn test_insert_after_anchor_line() {
        let updated = insert_declaration(GEMFILE, "gem 'sqlite3'", "newgem", "1.2.3").unwrap();
        assert_eq!(
            updated,
            "source 'https://rubygems.org'\n\ngem 'rails', '3.2.13'\n\ngem 'sqlite3'\ngem 'newgem', '~> 1.2.3'\n\ngem 'jquery-rails'\n"
        );
        // removing the inserted line gives back the input byte for byte
        assert_eq!(updated.replacen("\ngem 'newgem', '~> 1.2.3'", "", 1), GEMFILE);
    }

    #[test]
    fn test_insert_keeps_rest_of_anchor_line_intact() {
        let manifest = "gem 'sqlite3', '~> 1.4'\ngem 'puma'\n";
        let updated = insert_declaration(manifest, "gem 'sqlite3'", "bourbon", "7.3.0").unwrap();
        assert_eq!(
            updated,
            "gem 'sqlite3', '~> 1.4'\ngem 'bourbon', '~> 7.3.0'\ngem 'puma'\n"
        );
    }

    #[test]
    fn test_insert_at_end_of_file_without_newline() {
        let updated = insert_declaration("gem 'sqlite3'", "gem 'sqlite3'", "x", "1.0").unwrap();
        assert_eq!(updated, "gem 'sqlite3'\ngem 'x', '~> 1.0'");
    }

    #[test]
    fn test_insert_preserves_crlf() {
        let updated = insert_declaration("gem 'sqlite3'\r\ngem 'puma'\r\n", "gem 'sqlite3'", "x", "1.0")
            .unwrap();
        assert_eq!(updated, "gem 'sqlite3'\r\ngem 'x', '~> 1.0'\r\ngem 'puma'\r\n");
    }

    #[test]
    fn test_insert_missing_anchor() {
        let err = insert_declaration("gem 'pg'\n", "gem 'sqlite3'", "x", "1.0").unwrap_err();
        assert!(matches!(err, ScaffoldError::AnchorNotFound { .. }));
    }

    #[test]
    fn test_insert_empty_anchor_is_not_found() {
        let err = insert_declaration(GEMFILE, "", "x", "1.0").unwrap_err();
        assert!(matches!(err, ScaffoldError::AnchorNotFound { anchor } if anchor.is_empty()));
    }

    #[tokio::test]
    async fn test_add_dependency_empty_anchor_skips_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().with_gem("newgem", "newgem (1.2.3)");
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let err = editor.add_dependency(GEMFILE, "newgem", "").await.unwrap_err();

        assert!(matches!(err, ScaffoldError::AnchorNotFound { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_dependency_resolves_version() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().with_gem("newgem", "newgem (1.2.3, 1.2.2)");
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let (updated, version) = editor
            .add_dependency(GEMFILE, "newgem", "gem 'sqlite3'")
            .await
            .unwrap();

        assert_eq!(version, "1.2.3");
        assert!(updated.contains("gem 'sqlite3'\ngem 'newgem', '~> 1.2.3'\n"));
        assert_eq!(runner.rendered(), vec!["gem list newgem --remote"]);
    }

    #[tokio::test]
    async fn test_add_dependency_missing_anchor_skips_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new().with_gem("newgem", "newgem (1.2.3)");
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let err = editor
            .add_dependency("gem 'pg'\n", "newgem", "gem 'sqlite3'")
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::AnchorNotFound { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_dependency_unknown_gem() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new();
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let err = editor
            .add_dependency(GEMFILE, "nosuchgem", "gem 'sqlite3'")
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::VersionLookup { name } if name == "nosuchgem"));
    }

    #[tokio::test]
    async fn test_install_gem_writes_and_bundles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gemfile"), GEMFILE).unwrap();
        let runner = FakeRunner::new().with_gem("rails_config", "rails_config (0.3.3)");
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let version = editor
            .install_gem("rails_config", "gem 'sqlite3'", true)
            .await
            .unwrap();

        assert_eq!(version, "0.3.3");
        let written = std::fs::read_to_string(dir.path().join("Gemfile")).unwrap();
        assert!(written.contains("gem 'rails_config', '~> 0.3.3'"));
        assert_eq!(
            runner.rendered(),
            vec!["gem list rails_config --remote", "bundle install"]
        );
    }

    #[tokio::test]
    async fn test_install_gem_missing_anchor_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gemfile"), "gem 'pg'\n").unwrap();
        let runner = FakeRunner::new().with_gem("bourbon", "bourbon (7.3.0)");
        let toolchain = Toolchain::default();
        let editor = GemfileEditor::new(&runner, &toolchain, dir.path());

        let err = editor
            .install_gem("bourbon", "gem 'sqlite3'", true)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<ScaffoldError>().is_some());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Gemfile")).unwrap(),
            "gem 'pg'\n"
        );
        assert!(runner.calls().is_empty());
    }
}
