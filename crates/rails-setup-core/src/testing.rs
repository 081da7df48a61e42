//! Scripted collaborators for pipeline tests

use crate::error::ScaffoldError;
use crate::remote::AssetFetcher;
use crate::runtime::{Command, CommandOutput, CommandRunner};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub(crate) const GENERATED_GEMFILE: &str = "source 'https://rubygems.org'\n\ngem 'rails', '3.2.13'\n\n# Bundle edge Rails instead:\n# gem 'rails', :git => 'git://github.com/rails/rails.git'\n\ngem 'sqlite3'\n\ngem 'jquery-rails'\n";

pub(crate) const GENERATED_DATABASE_YML: &str =
    "development:\n  adapter: sqlite3\n  database: db/development.sqlite3\n";

pub(crate) const GENERATED_GITIGNORE: &str = "/.bundle\n/db/*.sqlite3\n/log/*.log\n/tmp\n";

pub(crate) const GENERATED_APPLICATION_CSS: &str =
    "/*\n *= require_self\n *= require_tree .\n */\n";

pub(crate) const GENERATED_RAILS_CONFIG_INITIALIZER: &str =
    "RailsConfig.setup do |config|\n  config.const_name = \"Settings\"\nend\n";

/// Records every command and imitates the side effects of the ones pipelines rely on
pub(crate) struct FakeRunner {
    calls: Mutex<Vec<Command>>,
    gem_listings: HashMap<String, String>,
    fail_on: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            gem_listings: HashMap::new(),
            fail_on: None,
        }
    }

    /// Index line returned by `gem list <name> --remote`
    pub fn with_gem(mut self, name: &str, listing: &str) -> Self {
        self.gem_listings
            .insert(name.to_string(), listing.to_string());
        self
    }

    /// Fail the first command whose rendered line contains `fragment`
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Messages of `git commit -m <message>` calls, in order
    pub fn commit_messages(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.program == "git" && c.args.first().map(String::as_str) == Some("commit"))
            .filter_map(|c| {
                c.args
                    .iter()
                    .position(|a| a == "-m")
                    .and_then(|i| c.args.get(i + 1).cloned())
            })
            .collect()
    }

    fn simulate(&self, command: &Command) -> std::io::Result<String> {
        let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
        match (command.program.as_str(), args.as_slice()) {
            ("rails", ["new", app]) => {
                generate_app(&command.cwd.join(app))?;
                Ok(format!("      create  {}\n", app))
            }
            ("rails", ["g", "rails_config:install"]) => {
                let initializers = command.cwd.join("config/initializers");
                std::fs::create_dir_all(&initializers)?;
                std::fs::write(
                    initializers.join("rails_config.rb"),
                    GENERATED_RAILS_CONFIG_INITIALIZER,
                )?;
                Ok("      create  config/initializers/rails_config.rb\n".to_string())
            }
            ("gem", ["list", name, "--remote"]) => Ok(self
                .gem_listings
                .get(*name)
                .map(|line| format!("\n*** REMOTE GEMS ***\n\n{}\n", line))
                .unwrap_or_else(|| "\n*** REMOTE GEMS ***\n\n".to_string())),
            _ => Ok(String::new()),
        }
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, command: &Command) -> Result<CommandOutput, ScaffoldError> {
        self.calls.lock().unwrap().push(command.clone());
        let line = command.to_string();
        if let Some(fragment) = &self.fail_on {
            if line.contains(fragment.as_str()) {
                return Err(ScaffoldError::CommandExecution {
                    command: line,
                    status: 1,
                    output: "simulated failure\n".to_string(),
                });
            }
        }
        let output = self.simulate(command)?;
        Ok(CommandOutput { output, status: 0 })
    }
}

fn generate_app(app_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(app_dir.join("config/initializers"))?;
    std::fs::create_dir_all(app_dir.join("app/assets/stylesheets"))?;
    std::fs::create_dir_all(app_dir.join("vendor/assets"))?;
    std::fs::write(app_dir.join("Gemfile"), GENERATED_GEMFILE)?;
    std::fs::write(app_dir.join("config/database.yml"), GENERATED_DATABASE_YML)?;
    std::fs::write(app_dir.join(".gitignore"), GENERATED_GITIGNORE)?;
    std::fs::write(
        app_dir.join("app/assets/stylesheets/application.css"),
        GENERATED_APPLICATION_CSS,
    )?;
    Ok(())
}

/// Serves one fixed body for every URL and records what was requested
pub(crate) struct FakeFetcher {
    body: Vec<u8>,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.as_bytes().to_vec(),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl AssetFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}
