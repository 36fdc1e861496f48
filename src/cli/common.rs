//! Shared pieces of the CLI commands: option flags, config loading, input
//! expansion and output writing.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{DependencyOutput, InlineConfig, InlineOptions};
use crate::constants::STREAM_CHUNK_SIZE;
use crate::engine::Inliner;
use crate::models::{FileContents, SourceFile};
use crate::utils::fs::{atomic_write, open_chunked};

/// Resolution flags shared by every command. Each one overrides the
/// corresponding key of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct InlineArgs {
    /// Directive pattern (regular expression with at least one capture group)
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Capture group holding the import path
    #[arg(long, value_name = "INDEX")]
    pub capture_group: Option<usize>,

    /// Match the directive pattern case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Content encoding label (e.g. utf-8, latin1, shift_jis)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Inline every occurrence of a repeated import
    #[arg(long)]
    pub allow_repeats: bool,

    /// Resolve directives inside inlined content
    #[arg(short, long)]
    pub recursive: bool,

    /// Infer missing file extensions from the directory listing
    #[arg(long)]
    pub infer_extension: bool,

    /// Maximum nesting depth for recursive imports
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Which files the update command emits
    #[arg(long, value_enum)]
    pub dependency_output: Option<DependencyOutput>,

    /// Warn about dropped repeated imports
    #[arg(long)]
    pub log_repeats: bool,

    /// Report each resolved file
    #[arg(long)]
    pub log_completion: bool,
}

impl InlineArgs {
    /// Layer the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(&self, config: InlineConfig) -> InlineConfig {
        let mut log = config.log.unwrap_or_default();
        log.repeats |= self.log_repeats;
        log.completion |= self.log_completion;

        let overrides = InlineConfig {
            pattern: self.pattern.clone(),
            case_insensitive: self.case_sensitive.then_some(false),
            capture_group: self.capture_group,
            encoding: self.encoding.clone(),
            import_once: self.allow_repeats.then_some(false),
            recursive: self.recursive.then_some(true),
            dependency_output: self.dependency_output,
            require_extension: self.infer_extension.then_some(false),
            max_depth: self.max_depth,
            hook_timeout_secs: None,
            log: Some(log),
        };
        config.overlay(overrides)
    }
}

/// Where commands find their configuration and inputs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Working directory; relative inputs and outputs resolve against it
    pub cwd: PathBuf,
    /// Explicit configuration file, if `--config` was given
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Context for the process's current directory.
    pub fn from_env(config_path: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(Self {
            cwd,
            config_path,
        })
    }

    /// Build an inliner from the configuration file and `args`.
    pub async fn inliner(&self, args: &InlineArgs) -> Result<Inliner> {
        let config = match &self.config_path {
            Some(path) => InlineConfig::load(&self.cwd.join(path)).await?,
            None => InlineConfig::load_or_default(&self.cwd).await?,
        };
        let options = InlineOptions::from_config(&args.apply(config))?;
        Ok(Inliner::new(options))
    }

    /// Expand glob patterns into a sorted, de-duplicated list of files.
    pub fn expand(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for pattern in patterns {
            let absolute = self.cwd.join(pattern);
            let absolute = absolute.to_string_lossy();
            let entries = glob::glob(&absolute)
                .with_context(|| format!("Invalid file pattern: {pattern}"))?;

            let before = files.len();
            for entry in entries {
                let path = entry.with_context(|| format!("Failed to read match of {pattern}"))?;
                if path.is_file() {
                    files.push(path);
                }
            }
            if files.len() == before {
                tracing::warn!("Pattern '{}' matched no files", pattern);
            }
        }
        files.sort();
        files.dedup();

        if files.is_empty() {
            anyhow::bail!("No input files matched {}", patterns.join(", "));
        }
        Ok(files)
    }

    /// Open `path` as a buffered or streamed source file.
    pub async fn open(&self, path: &Path, stream: bool) -> Result<SourceFile> {
        let contents = if stream {
            FileContents::Stream(open_chunked(path, STREAM_CHUNK_SIZE).await?)
        } else {
            FileContents::Buffer(
                tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        };
        Ok(SourceFile {
            cwd: self.cwd.clone(),
            base: self.cwd.clone(),
            path: Some(path.to_path_buf()),
            contents,
        })
    }
}

/// Destination for resolved files.
#[derive(Debug, Clone)]
pub enum Output {
    /// Print to stdout; with `headers`, each file is preceded by its name
    Stdout {
        /// Print a `==> name <==` line before each file
        headers: bool,
    },
    /// Write under a directory, mirroring each file's relative path
    Dir(PathBuf),
}

impl Output {
    /// Pick stdout or `out_dir`. Headers are printed when several files go to stdout.
    #[must_use]
    pub fn new(out_dir: Option<PathBuf>, file_count: usize) -> Self {
        match out_dir {
            Some(dir) => Self::Dir(dir),
            None => Self::Stdout {
                headers: file_count > 1,
            },
        }
    }

    /// Drain `file` and write it out.
    pub async fn write(&self, file: SourceFile) -> Result<()> {
        let relative = file.descriptor().map(|d| d.relative()).unwrap_or_default();
        let bytes = file
            .into_bytes()
            .await
            .with_context(|| format!("Failed to resolve {}", relative.display()))?;

        match self {
            Self::Dir(dir) => {
                let target = dir.join(&relative);
                atomic_write(&target, &bytes).await?;
                tracing::info!("Wrote {}", target.display());
            }
            Self::Stdout {
                headers,
            } => {
                let mut stdout = std::io::stdout().lock();
                if *headers {
                    writeln!(stdout, "==> {} <==", relative.display())?;
                }
                stdout.write_all(&bytes)?;
                if *headers && !bytes.ends_with(b"\n") {
                    writeln!(stdout)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
