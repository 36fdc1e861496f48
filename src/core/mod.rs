//! Core types shared by every layer of the inliner
//!
//! - [`error`] - [`InlineError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`file_error`] - File operation errors that capture their context at the call site
//!
//! Library functions return `Result<T, InlineError>`; the binary and tests work
//! with [`anyhow::Result`] and convert to [`ErrorContext`] for display.

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, InlineError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
