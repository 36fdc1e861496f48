//! Global constants used throughout the inliner.
//!
//! Defaults for every configuration option live here so the config layer, the
//! CLI help text and the tests agree on them.

use std::time::Duration;

/// Default directive pattern.
///
/// Matches `import "path"`, `@import 'path';` and similar. Capture group 1
/// holds the path argument. Compiled case-insensitively unless configured
/// otherwise.
pub const DEFAULT_PATTERN: &str = r#"@?import\s+["']\s*(.*)\s*["'];?"#;

/// Default capture group holding the path argument.
pub const DEFAULT_CAPTURE_GROUP: usize = 1;

/// Default text encoding label.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Maximum nesting depth for recursive imports.
///
/// Deeper chains fail with `MaxDepthExceeded` instead of recursing further.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Timeout for a transformation hook to produce a dependency's content.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Chunk size used when re-opening dependents as streams (64 KiB).
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "inliner.toml";
