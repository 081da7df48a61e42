//! Existing application pipeline
//!
//! Installs gems, seeds local config from the committed templates and runs
//! the build/migrate commands for the target environment.

use crate::config::{ConfigureOptions, Toolchain};
use crate::report::Reporter;
use crate::runtime::{Command, CommandRunner};
use crate::templates::seed_all;
use anyhow::Result;
use std::path::Path;

/// Configures an existing Rails application for development or production
pub struct Configurer<'a, R: CommandRunner> {
    options: &'a ConfigureOptions,
    toolchain: &'a Toolchain,
    runner: &'a R,
    reporter: &'a dyn Reporter,
}

impl<'a, R: CommandRunner> Configurer<'a, R> {
    pub fn new(
        options: &'a ConfigureOptions,
        toolchain: &'a Toolchain,
        runner: &'a R,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            options,
            toolchain,
            runner,
            reporter,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let project = &self.options.project_dir;

        self.reporter.step("Installing gems...");
        self.runner
            .run(&Command::new(&self.toolchain.bundle, project).arg("install"))
            .await?;

        self.seed_local_config(project).await?;

        for (message, command) in self.build_commands() {
            self.reporter.step(message);
            self.runner.run(&command).await?;
        }

        self.reporter
            .warn("Be sure to replace any local settings with the appropriate settings...");
        Ok(())
    }

    async fn seed_local_config(&self, project: &Path) -> Result<()> {
        for seeded in seed_all(&project.join("config")).await? {
            let target = seeded
                .target
                .strip_prefix(project)
                .unwrap_or(&seeded.target)
                .display()
                .to_string();
            if seeded.copied {
                self.reporter.step(&format!("Loading {}...", target));
            } else {
                self.reporter
                    .info(&format!("{} already exists, leaving it alone", target));
            }
        }
        Ok(())
    }

    /// Environment-specific commands, in the order they run
    fn build_commands(&self) -> Vec<(&'static str, Command)> {
        let project = &self.options.project_dir;
        let rake = |task: &str| {
            let command = Command::new(&self.toolchain.rake, project).arg(task);
            if self.options.production {
                command.env("RAILS_ENV", "production")
            } else {
                command
            }
        };

        let mut commands = Vec::new();
        if self.options.production {
            commands.push(("Compiling assets...", rake("assets:precompile")));
        }
        commands.push(("Migrating database...", rake("db:migrate")));
        commands
    }
}
