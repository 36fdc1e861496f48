//! Error handling for the inliner
//!
//! This module provides the error types and user-friendly error reporting for the
//! import inliner. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`InlineError`] - Enumerated failure modes of a resolution pass
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! - **Input**: [`InlineError::InvalidInput`]
//! - **Dependencies**: [`InlineError::DependencyNotFound`], [`InlineError::HookFailure`],
//!   [`InlineError::CircularImport`], [`InlineError::MaxDepthExceeded`]
//! - **Configuration**: [`InlineError::InvalidPattern`], [`InlineError::InvalidCaptureGroup`],
//!   [`InlineError::UnknownEncoding`], [`InlineError::ConfigError`]
//! - **File System**: [`InlineError::Io`]
//!
//! A repeated import is never an error. It is handled by the import-once policy
//! and at most logged.
//!
//! # Examples
//!
//! ```rust,no_run
//! use inline_imports::core::{InlineError, user_friendly_error};
//! use std::path::PathBuf;
//!
//! let error = InlineError::DependencyNotFound {
//!     path: PathBuf::from("/project/lib.txt"),
//!     referenced_by: PathBuf::from("/project/src.txt"),
//!     reason: "No such file or directory".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for inliner operations.
///
/// Every variant that concerns a dependency carries both the offending path and
/// the path of the file whose directive referenced it, so the failing pipeline
/// stage can report both.
#[derive(Error, Debug, Clone)]
pub enum InlineError {
    /// Content was supplied without a source path.
    ///
    /// Relative directives cannot be resolved without a base path, so this is
    /// fatal for the file and no output is produced for it.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// A directive's resolved path could not be read.
    ///
    /// Also raised when extension inference finds no matching directory entry.
    #[error("Dependency not found: {} (imported by {})", path.display(), referenced_by.display())]
    DependencyNotFound {
        /// The resolved dependency path
        path: PathBuf,
        /// The file containing the directive
        referenced_by: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// The transformation hook failed or did not finish in time.
    ///
    /// Reported in the same category as [`InlineError::DependencyNotFound`]
    /// because the dependency's content could not be obtained.
    #[error("Transform hook failed for {} (imported by {}): {reason}", path.display(), referenced_by.display())]
    HookFailure {
        /// The dependency the hook was asked to produce
        path: PathBuf,
        /// The file containing the directive
        referenced_by: PathBuf,
        /// Hook error message or timeout description
        reason: String,
    },

    /// A recursive import chain leads back to one of its own ancestors.
    #[error("Circular import detected: {}", format_chain(chain))]
    CircularImport {
        /// Files from the outermost import to the repeated one
        chain: Vec<PathBuf>,
    },

    /// Recursive imports nested deeper than the configured limit.
    #[error("Maximum import depth of {max_depth} exceeded while importing {}", path.display())]
    MaxDepthExceeded {
        /// The configured limit
        max_depth: usize,
        /// The dependency that would have exceeded it
        path: PathBuf,
    },

    /// The directive pattern is not a valid regular expression.
    #[error("Invalid directive pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as configured
        pattern: String,
        /// Compiler error message
        reason: String,
    },

    /// The capture group index does not exist in the directive pattern.
    #[error("Capture group {index} does not exist in the directive pattern ({available} groups available)")]
    InvalidCaptureGroup {
        /// Configured index
        index: usize,
        /// Number of explicit capture groups in the pattern
        available: usize,
    },

    /// The configured encoding label is not recognised.
    #[error("Unknown text encoding: '{label}'")]
    UnknownEncoding {
        /// The label as configured
        label: String,
    },

    /// Configuration file could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// A file system operation outside dependency loading failed.
    #[error("File system error: {operation} on {}: {reason}", path.display())]
    Io {
        /// The operation being performed
        operation: String,
        /// The path involved
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Any other failure, carried as a message.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl InlineError {
    /// Whether the error means a dependency's content could not be obtained.
    ///
    /// True for [`InlineError::DependencyNotFound`] and [`InlineError::HookFailure`].
    #[must_use]
    pub fn is_dependency_not_found(&self) -> bool {
        matches!(self, Self::DependencyNotFound { .. } | Self::HookFailure { .. })
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
}

/// Error wrapper with user-facing details and a suggestion.
///
/// Created by [`user_friendly_error`] for display by the binary, or built by hand
/// with [`ErrorContext::with_details`] and [`ErrorContext::with_suggestion`].
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: InlineError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: InlineError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognises [`InlineError`] anywhere in the error chain, then
/// [`FileOperationError`](crate::core::file_error::FileOperationError),
/// [`std::io::Error`] and [`toml::de::Error`]. Anything else is reported with
/// its full context chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(inline_error) = error.chain().find_map(|e| e.downcast_ref::<InlineError>()) {
        return create_error_context(inline_error.clone());
    }

    if let Some(file_error) = error.downcast_ref::<crate::core::file_error::FileOperationError>() {
        return ErrorContext::new(InlineError::Io {
            operation: file_error.operation.to_string(),
            path: file_error.file_path.clone(),
            reason: file_error.source.to_string(),
        })
        .with_details(file_error.user_message());
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(InlineError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your inliner.toml file. Verify quotes, brackets, and key names")
        .with_details("Configuration keys are: pattern, case_insensitive, capture_group, encoding, import_once, recursive, dependency_output, require_extension, max_depth, hook_timeout_secs, [log]");
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let ctx = ErrorContext::new(InlineError::Io {
            operation: "file access".to_string(),
            path: PathBuf::from("unknown"),
            reason: io_error.to_string(),
        });
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ctx
                .with_suggestion("Check file ownership and permissions")
                .with_details("The inliner does not have permission to read or write a file"),
            std::io::ErrorKind::NotFound => ctx
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => ctx,
        };
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>();
    let ctx = ErrorContext::new(InlineError::Other {
        message: error.to_string(),
    });
    if details.is_empty() {
        ctx
    } else {
        ctx.with_details(details.join("\n"))
    }
}

fn create_error_context(error: InlineError) -> ErrorContext {
    match &error {
        InlineError::InvalidInput { .. } => ErrorContext::new(error)
            .with_suggestion("Make sure every file handed to the inliner has a source path")
            .with_details("Relative import directives are resolved against the directory of the importing file"),

        InlineError::DependencyNotFound { path, referenced_by, .. } => {
            let suggestion = if path.extension().is_none() {
                "Add the file extension to the import, or disable 'require_extension' to let the inliner infer it"
            } else {
                "Check that the imported file exists. Paths are relative to the importing file's directory"
            };
            let details = format!(
                "Import paths are resolved relative to: {}",
                referenced_by.parent().unwrap_or(referenced_by).display()
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }

        InlineError::HookFailure { .. } => ErrorContext::new(error)
            .with_suggestion("Check the transformation hook for errors, or raise 'hook_timeout_secs'")
            .with_details("The dependency's content comes from the transformation hook, which did not produce it"),

        InlineError::CircularImport { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the imports in the cycle")
            .with_details("Recursive import is enabled and the files import each other"),

        InlineError::MaxDepthExceeded { .. } => ErrorContext::new(error)
            .with_suggestion("Flatten the import hierarchy or raise 'max_depth' in inliner.toml"),

        InlineError::InvalidPattern { .. } => ErrorContext::new(error)
            .with_suggestion("Check the 'pattern' option. It must be a valid regular expression with at least one capture group"),

        InlineError::InvalidCaptureGroup { .. } => ErrorContext::new(error)
            .with_suggestion("Set 'capture_group' to the index of the group that captures the path (groups start at 1)"),

        InlineError::UnknownEncoding { .. } => ErrorContext::new(error)
            .with_suggestion("Use a standard encoding label such as 'utf-8', 'utf-16le', 'windows-1252' or 'latin1'"),

        InlineError::ConfigError { .. } | InlineError::Io { .. } | InlineError::Other { .. } => {
            ErrorContext::new(error)
        }
    }
}
