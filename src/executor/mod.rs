//! Running resolution passes over whole files.
//!
//! Two executors share the substitution engine:
//!
//! - [`buffered`] decodes a complete buffer, substitutes once with a fresh
//!   resolve stack and re-encodes the result
//! - [`streaming`] substitutes chunk by chunk as they arrive, sharing one
//!   resolve stack for the whole stream
//!
//! Both start with [`validate_input`]: files without content pass through
//! untouched, files without a source path are rejected, and everything else
//! gets a canonical descriptor so the dependency cache holds one entry per
//! file however it was named.

pub mod buffered;
pub mod streaming;

pub use streaming::stream_error;

use crate::core::InlineError;
use crate::engine::Inliner;
use crate::models::{EntityDescriptor, SourceFile};
use crate::resolver::canonicalize;

/// Check that `file` can be resolved.
///
/// Returns `Ok(None)` when the file has no content and must be passed through
/// unchanged, and the file's descriptor otherwise. The descriptor's path and
/// base are canonicalized through the file system, matching the keys the
/// resolver produces for dependencies.
///
/// # Errors
///
/// [`InlineError::InvalidInput`] if the file has content but no source path.
pub async fn validate_input(file: &SourceFile) -> Result<Option<EntityDescriptor>, InlineError> {
    if file.is_null() {
        return Ok(None);
    }
    let Some(descriptor) = file.descriptor() else {
        return Err(InlineError::InvalidInput {
            reason: "content has no source path to resolve imports against".to_string(),
        });
    };
    Ok(Some(EntityDescriptor {
        base: canonicalize(&descriptor.base).await,
        path: canonicalize(&descriptor.path).await,
        cwd: descriptor.cwd,
    }))
}

impl Inliner {
    /// Resolve `file` with the executor matching its content view.
    ///
    /// # Errors
    ///
    /// See [`Inliner::run_buffered`] and [`Inliner::run_streaming`].
    pub async fn run(&self, file: SourceFile) -> Result<SourceFile, InlineError> {
        if file.is_stream() {
            self.run_streaming(file).await
        } else {
            self.run_buffered(file).await
        }
    }
}
