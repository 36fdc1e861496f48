//! inline-imports - import-directive inliner with a reverse dependency cache
//!
//! Scans content for import directives (by default `@import "./lib.txt";` and
//! its variants) and replaces each one with the content of the file it
//! names, resolved relative to the importing file. Every resolution records
//! which file imported which, so when a file changes, the files that depend on
//! it can be found and rebuilt.
//!
//! # Architecture Overview
//!
//! - Content arrives as a [`SourceFile`] holding either one buffer or a chunk
//!   stream
//! - The buffered and streaming executors hand decoded text to the
//!   substitution engine ([`Inliner::substitute`])
//! - The engine resolves each directive's path, applies the import-once policy,
//!   loads the dependency (from disk or a [`TransformHook`]) and splices it in
//! - Each inlined dependency is recorded in the [`DependencyCache`]
//! - [`Inliner::update_dependents`] runs the cache in reverse: given a changed
//!   file it re-resolves every file that imported it
//!
//! # Core Modules
//!
//! - [`engine`] - [`Inliner`] and the substitution pass
//! - [`executor`] - buffered and streaming execution, input validation
//! - [`update`] - re-resolving dependents of a changed file
//! - [`resolver`] - path resolution and the per-pass resolve stack
//! - [`source`] - dependency content loading and transformation hooks
//! - [`cache`] - the reverse dependency cache
//!
//! ## Supporting Modules
//!
//! - [`config`] - raw (`inliner.toml`) and validated options
//! - [`core`] - error types and user-facing error reporting
//! - [`encoding`] - text decoding and encoding
//! - [`models`] - the file representation
//! - [`utils`] - path and file system helpers
//! - [`cli`] - the `inliner` command-line front end
//!
//! # Example
//!
//! ```rust,no_run
//! use inline_imports::{InlineOptions, Inliner, SourceFile};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let inliner = Inliner::new(InlineOptions::default());
//!
//! let bytes = tokio::fs::read("src.txt").await?;
//! let file = SourceFile::buffered(std::env::current_dir()?, "src.txt", bytes);
//! let resolved = inliner.run(file).await?;
//! println!("{}", String::from_utf8_lossy(&resolved.into_bytes().await?));
//!
//! // Later, after lib.txt changed:
//! let lib = SourceFile::buffered(std::env::current_dir()?, "lib.txt", tokio::fs::read("lib.txt").await?);
//! for updated in inliner.update_dependents(lib).await? {
//!     println!("rebuilt {:?}", updated.path);
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod engine;
pub mod executor;
pub mod resolver;
pub mod source;
pub mod update;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod encoding;
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::DependencyCache;
pub use config::{DependencyOutput, InlineConfig, InlineOptions, LogOptions};
pub use crate::core::InlineError;
pub use engine::{Inliner, PassReport};
pub use models::{ChunkStream, EntityDescriptor, FileContents, SourceFile};
pub use resolver::ResolveStack;
pub use source::{TransformHook, transform_fn};
