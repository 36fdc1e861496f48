//! Command-line interface for the inliner.
//!
//! # Commands
//!
//! - `resolve` - Resolve import directives in files and write the results
//! - `update` - Re-resolve the files that import a changed file
//! - `deps` - Show which files import which
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - No logging; only errors are printed
//! - `--config` / `-c` - Configuration file (default: `inliner.toml` in the working directory)
//!
//! `RUST_LOG` takes precedence over `--verbose` and the default `info` level.
//!
//! # Examples
//!
//! ```bash
//! # Resolve every page into dist/
//! inliner resolve 'pages/*.html' --out-dir dist
//!
//! # After editing a partial, rebuild only the pages that include it
//! inliner update partials/header.html --files 'pages/*.html' --dependency-output dependant --out-dir dist
//!
//! # Inspect the import graph
//! inliner deps 'pages/*.html'
//! ```

mod common;
mod deps;
mod resolve;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::{CommandContext, InlineArgs, Output};
pub use deps::DepsCommand;
pub use resolve::ResolveCommand;
pub use update::UpdateCommand;

/// Settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can run commands with an explicit
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging
    pub log_level: Option<String>,
    /// Configuration file given with `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Configuration with logging off and the default config file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over `log_level` when set. Does nothing if a subscriber
    /// is already installed.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Import-directive inliner.
#[derive(Parser, Debug)]
#[command(
    name = "inliner",
    about = "Inline import directives and rebuild the files that depend on a change",
    version,
    long_about = "Replaces import directives (e.g. @import \"./lib.txt\";) with the content of the \
                  referenced file, and tracks which files import which so a changed file's \
                  dependents can be rebuilt."
)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging; errors are still printed
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: inliner.toml in the working directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve import directives in files
    Resolve(ResolveCommand),

    /// Re-resolve the files that import a changed file
    Update(UpdateCommand),

    /// Show which files import which
    Deps(DepsCommand),
}

impl Cli {
    /// Execute the parsed command with configuration from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, and the
    /// default is `info`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let ctx = CommandContext::from_env(config.config_path)?;

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&ctx).await,
            Commands::Update(cmd) => cmd.execute(&ctx).await,
            Commands::Deps(cmd) => cmd.execute(&ctx).await,
        }
    }
}
