//! New application pipeline
//!
//! Generates the app with `rails new`, moves machine-specific config behind
//! templates, wires in rails_config with a secret token, optionally adds
//! bourbon, and commits along the way. The first failing step aborts the run;
//! files written and commits made before it stay in place.

use super::files::{
    self, BASE_PARTIALS, ENVIRONMENT_CHECK, LOCAL_SETTINGS_TEMPLATE, SCAFFOLD_IGNORE_RULES,
    SECRET_TOKEN_INITIALIZER, STYLESHEET_FOLDERS,
};
use crate::config::{ScaffoldOptions, Toolchain};
use crate::error::ScaffoldError;
use crate::gemfile::GemfileEditor;
use crate::remote::AssetFetcher;
use crate::report::Reporter;
use crate::runtime::{Command, CommandOutput, CommandRunner};
use crate::templates::{render, Substitution};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const INITIAL_COMMIT: &str = "Initial commit";
pub const RAILS_CONFIG_COMMIT: &str = "Added rails config gem";
pub const BOURBON_COMMIT: &str = "Add bourbon gem";

/// Creates and sets up a new Rails application
pub struct Scaffolder<'a, R: CommandRunner, F: AssetFetcher> {
    options: &'a ScaffoldOptions,
    toolchain: &'a Toolchain,
    runner: &'a R,
    fetcher: &'a F,
    reporter: &'a dyn Reporter,
}

impl<'a, R: CommandRunner, F: AssetFetcher> Scaffolder<'a, R, F> {
    pub fn new(
        options: &'a ScaffoldOptions,
        toolchain: &'a Toolchain,
        runner: &'a R,
        fetcher: &'a F,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            options,
            toolchain,
            runner,
            fetcher,
            reporter,
        }
    }

    /// Run every step in order; returns the new application directory
    pub async fn run(&self) -> Result<PathBuf> {
        let app_dir = self.options.project_dir();

        if fs::try_exists(&app_dir)
            .await
            .with_context(|| format!("Failed to check {}", app_dir.display()))?
        {
            return Err(ScaffoldError::TargetExists(app_dir).into());
        }

        self.reporter.step("Updating rails gem...");
        self.exec(&self.toolchain.gem, &self.options.parent_dir, ["update", "rails"])
            .await?;

        self.reporter.step("Generating rails app...");
        self.exec(
            &self.toolchain.rails,
            &self.options.parent_dir,
            ["new", self.options.app_name.as_str()],
        )
        .await?;

        self.ignore_local_files(&app_dir).await?;

        self.reporter.step("Creating readme file...");
        files::write(&app_dir.join("README.md"), files::readme(&self.options.app_name)).await?;

        self.reporter.step("Initializing git...");
        self.exec(&self.toolchain.git, &app_dir, ["init"]).await?;
        self.commit(&app_dir, ["add", "."], INITIAL_COMMIT).await?;

        self.install_rails_config(&app_dir).await?;
        self.commit(&app_dir, ["add", "."], RAILS_CONFIG_COMMIT).await?;

        if self.options.bourbon {
            self.install_bourbon(&app_dir).await?;
            self.commit(&app_dir, ["add", "-A", "."], BOURBON_COMMIT).await?;
        }

        self.reporter.success(&format!(
            "Created {} in {}",
            self.options.app_name,
            app_dir.display()
        ));
        Ok(app_dir)
    }

    async fn exec<I, S>(
        &self,
        program: &str,
        dir: &Path,
        args: I,
    ) -> Result<CommandOutput, ScaffoldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(&Command::new(program, dir).args(args)).await
    }

    async fn commit<const N: usize>(
        &self,
        app_dir: &Path,
        add: [&str; N],
        message: &str,
    ) -> Result<()> {
        self.exec(&self.toolchain.git, app_dir, add).await?;
        self.exec(&self.toolchain.git, app_dir, ["commit", "-m", message]).await?;
        Ok(())
    }

    /// Keep `database.yml` as a committed template and ignore the real file
    async fn ignore_local_files(&self, app_dir: &Path) -> Result<()> {
        self.reporter.step("Moving and ignoring database.yml...");
        let config = app_dir.join("config");
        let database = config.join("database.yml");
        let template = config.join("database.template.yml");
        fs::copy(&database, &template).await.with_context(|| {
            format!(
                "Failed to copy {} to {}",
                database.display(),
                template.display()
            )
        })?;

        files::append(
            &app_dir.join(".gitignore"),
            &files::ignore_block(&SCAFFOLD_IGNORE_RULES),
        )
        .await
    }

    async fn install_rails_config(&self, app_dir: &Path) -> Result<()> {
        self.reporter.step("Installing rails_config...");
        let editor = GemfileEditor::new(self.runner, self.toolchain, app_dir);
        let version = editor
            .install_gem("rails_config", &self.options.gem_anchor, true)
            .await?;
        self.reporter
            .info(&format!("Pinned rails_config to ~> {}", version));

        self.exec(&self.toolchain.rails, app_dir, ["g", "rails_config:install"])
            .await?;

        let initializers = app_dir.join("config/initializers");
        fs::create_dir_all(&initializers)
            .await
            .with_context(|| format!("Failed to create {}", initializers.display()))?;
        files::append(&initializers.join("rails_config.rb"), ENVIRONMENT_CHECK).await?;
        files::write(&initializers.join("secret_token.rb"), SECRET_TOKEN_INITIALIZER).await?;

        let config = app_dir.join("config");
        files::write(
            &config.join("settings.local.template.yml"),
            LOCAL_SETTINGS_TEMPLATE,
        )
        .await?;
        files::write(
            &config.join("settings.local.yml"),
            render(LOCAL_SETTINGS_TEMPLATE, Some(&Substitution::secret_token())),
        )
        .await
    }

    async fn install_bourbon(&self, app_dir: &Path) -> Result<()> {
        self.reporter.step("Adding bourbon gem...");
        let editor = GemfileEditor::new(self.runner, self.toolchain, app_dir);
        let version = editor
            .install_gem("bourbon", &self.options.gem_anchor, true)
            .await?;
        self.reporter.info(&format!("Pinned bourbon to ~> {}", version));

        let stylesheets = app_dir.join("app/assets/stylesheets");
        for folder in STYLESHEET_FOLDERS {
            let path = stylesheets.join(folder);
            fs::create_dir_all(&path)
                .await
                .with_context(|| format!("Failed to create {}", path.display()))?;
        }
        for partial in BASE_PARTIALS {
            files::touch(&stylesheets.join("base").join(format!("{}.sass", partial))).await?;
        }

        self.reporter.info("Fetching normalize.css...");
        let normalize = self.fetcher.fetch(&self.options.normalize_url).await?;
        let vendor = app_dir.join("vendor/assets/stylesheets");
        fs::create_dir_all(&vendor)
            .await
            .with_context(|| format!("Failed to create {}", vendor.display()))?;
        files::write(&vendor.join("normalize.css"), normalize).await?;

        let css = stylesheets.join("application.css");
        let scss = stylesheets.join("application.css.scss");
        fs::rename(&css, &scss)
            .await
            .with_context(|| format!("Failed to rename {}", css.display()))?;
        let content = fs::read_to_string(&scss)
            .await
            .with_context(|| format!("Failed to read {}", scss.display()))?;
        files::write(&scss, files::rewrite_application_stylesheet(&content)).await
    }
}
