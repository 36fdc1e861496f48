//! Configuration for the inliner.
//!
//! Configuration comes in two shapes:
//!
//! - [`InlineConfig`] - the raw, serializable form. Every field is optional so a
//!   TOML file (`inliner.toml`) or the command line only needs to name what it
//!   changes. Two configs can be layered with [`InlineConfig::overlay`].
//! - [`InlineOptions`] - the validated, immutable form the engine runs with.
//!   [`InlineOptions::from_config`] fills in defaults, compiles the directive
//!   pattern and checks the capture group and encoding.
//!
//! # Defaults
//!
//! | key | default |
//! |-----|---------|
//! | `pattern` | `@?import\s+["']\s*(.*)\s*["'];?` |
//! | `case_insensitive` | `true` |
//! | `capture_group` | `1` |
//! | `encoding` | `utf-8` |
//! | `import_once` | `true` |
//! | `recursive` | `false` |
//! | `dependency_output` | `primary` |
//! | `require_extension` | `true` |
//! | `max_depth` | `10` |
//! | `hook_timeout_secs` | `30` |
//! | `[log] repeats`, `[log] completion` | `false` |
//!
//! # Example
//!
//! ```toml
//! pattern = '#include\s+"(.+)"'
//! recursive = true
//! dependency_output = "all"
//!
//! [log]
//! repeats = true
//! ```

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_CAPTURE_GROUP, DEFAULT_ENCODING, DEFAULT_HOOK_TIMEOUT,
    DEFAULT_MAX_DEPTH, DEFAULT_PATTERN,
};
use crate::core::InlineError;
use crate::encoding::TextCodec;

/// Which files [`Inliner::update_dependents`](crate::Inliner::update_dependents)
/// emits in buffered mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DependencyOutput {
    /// Only the changed file itself, passed through unchanged
    #[default]
    Primary,
    /// Only the re-resolved files that import it
    #[serde(alias = "dependent")]
    #[value(alias = "dependent")]
    Dependant,
    /// The changed file followed by its re-resolved dependents
    All,
}

impl DependencyOutput {
    /// Whether the primary file is emitted.
    #[must_use]
    pub fn emits_primary(self) -> bool {
        matches!(self, Self::Primary | Self::All)
    }

    /// Whether re-resolved dependents are emitted.
    #[must_use]
    pub fn emits_dependents(self) -> bool {
        matches!(self, Self::Dependant | Self::All)
    }
}

/// Diagnostic switches.
///
/// When a switch is off the event is still traced, at `debug` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Warn when a repeated import is dropped
    pub repeats: bool,
    /// Report each completed resolution pass at `info` level
    pub completion: bool,
}

/// Raw configuration with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineConfig {
    /// Directive pattern; must contain at least one capture group
    pub pattern: Option<String>,
    /// Match the pattern case-insensitively
    pub case_insensitive: Option<bool>,
    /// Capture group holding the path argument
    pub capture_group: Option<usize>,
    /// Encoding label for decoding and encoding content
    pub encoding: Option<String>,
    /// Inline each dependency at most once per resolution pass
    pub import_once: Option<bool>,
    /// Resolve directives inside inlined content
    pub recursive: Option<bool>,
    /// Output policy for dependency updates
    pub dependency_output: Option<DependencyOutput>,
    /// When false, a missing extension is inferred from the directory listing
    pub require_extension: Option<bool>,
    /// Maximum nesting depth for recursive imports
    pub max_depth: Option<usize>,
    /// Seconds a transformation hook may take per dependency
    pub hook_timeout_secs: Option<u64>,
    /// Diagnostic switches
    pub log: Option<LogOptions>,
}

impl InlineConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema (unknown keys are rejected).
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `inliner.toml` from `dir` if it exists, otherwise the empty config.
    pub async fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!("Loading configuration from {}", path.display());
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Layer `overrides` on top of `self`: every field set in `overrides` wins.
    #[must_use]
    pub fn overlay(self, overrides: InlineConfig) -> InlineConfig {
        InlineConfig {
            pattern: overrides.pattern.or(self.pattern),
            case_insensitive: overrides.case_insensitive.or(self.case_insensitive),
            capture_group: overrides.capture_group.or(self.capture_group),
            encoding: overrides.encoding.or(self.encoding),
            import_once: overrides.import_once.or(self.import_once),
            recursive: overrides.recursive.or(self.recursive),
            dependency_output: overrides.dependency_output.or(self.dependency_output),
            require_extension: overrides.require_extension.or(self.require_extension),
            max_depth: overrides.max_depth.or(self.max_depth),
            hook_timeout_secs: overrides.hook_timeout_secs.or(self.hook_timeout_secs),
            log: overrides.log.or(self.log),
        }
    }
}

/// Validated, immutable resolution options.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// Compiled directive pattern
    pub pattern: Regex,
    /// Capture group holding the path argument
    pub capture_group: usize,
    /// Content encoding
    pub encoding: TextCodec,
    /// Inline each dependency at most once per resolution pass
    pub import_once: bool,
    /// Resolve directives inside inlined content
    pub recursive: bool,
    /// Output policy for dependency updates in buffered mode
    pub dependency_output: DependencyOutput,
    /// When false, a missing extension is inferred from the directory listing
    pub require_extension: bool,
    /// Diagnostic switches
    pub log: LogOptions,
    /// Maximum nesting depth for recursive imports
    pub max_depth: usize,
    /// Time a transformation hook may take per dependency
    pub hook_timeout: Duration,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self::from_config(&InlineConfig::default())
            .expect("built-in default configuration must be valid")
    }
}

impl InlineOptions {
    /// Build options from a raw config, filling defaults for unset fields.
    ///
    /// # Errors
    ///
    /// - [`InlineError::InvalidPattern`] if the pattern does not compile or has no capture group
    /// - [`InlineError::InvalidCaptureGroup`] if the capture group index is 0 or out of range
    /// - [`InlineError::UnknownEncoding`] if the encoding label is not recognised
    pub fn from_config(config: &InlineConfig) -> Result<Self, InlineError> {
        let source = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        let pattern = RegexBuilder::new(source)
            .case_insensitive(config.case_insensitive.unwrap_or(true))
            .build()
            .map_err(|e| InlineError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })?;

        // captures_len counts the implicit whole-match group 0
        let available = pattern.captures_len() - 1;
        if available == 0 {
            return Err(InlineError::InvalidPattern {
                pattern: source.to_string(),
                reason: "pattern must contain at least one capture group".to_string(),
            });
        }

        let capture_group = config.capture_group.unwrap_or(DEFAULT_CAPTURE_GROUP);
        if capture_group == 0 || capture_group > available {
            return Err(InlineError::InvalidCaptureGroup {
                index: capture_group,
                available,
            });
        }

        let encoding = TextCodec::for_label(config.encoding.as_deref().unwrap_or(DEFAULT_ENCODING))?;

        Ok(Self {
            pattern,
            capture_group,
            encoding,
            import_once: config.import_once.unwrap_or(true),
            recursive: config.recursive.unwrap_or(false),
            dependency_output: config.dependency_output.unwrap_or_default(),
            require_extension: config.require_extension.unwrap_or(true),
            log: config.log.unwrap_or_default(),
            max_depth: config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            hook_timeout: config
                .hook_timeout_secs
                .map_or(DEFAULT_HOOK_TIMEOUT, Duration::from_secs),
        })
    }
}
