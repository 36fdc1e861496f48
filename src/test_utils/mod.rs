//! Test utilities for the inliner
//!
//! Helpers shared by unit and integration tests: one-time logging setup and a
//! temporary project directory for writing fixture files.
//!
//! # Example
//!
//! ```rust,no_run
//! use inline_imports::test_utils::TestProject;
//!
//! let project = TestProject::new().unwrap();
//! project.write("lib.txt", "shared\n").unwrap();
//! project.write("src.txt", "@import \"./lib.txt\";\n").unwrap();
//! let file = project.source_file("src.txt").unwrap();
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::models::SourceFile;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=inline_imports=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// A temporary directory holding fixture files.
///
/// The root is canonicalized so paths built from it compare equal to the
/// dependency paths the resolver produces.
pub struct TestProject {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = std::fs::canonicalize(temp_dir.path())
            .context("Failed to canonicalize temp directory")?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories. Returns its absolute path.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write fixture {}", path.display()))?;
        Ok(path)
    }

    /// Read a file as UTF-8.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Load a file as a buffered [`SourceFile`] rooted at the project.
    pub fn source_file(&self, relative: &str) -> Result<SourceFile> {
        let bytes = std::fs::read(self.path(relative))?;
        Ok(SourceFile::buffered(self.root.clone(), relative, bytes))
    }
}
