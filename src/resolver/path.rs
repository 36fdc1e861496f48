//! Turning a directive's raw path argument into a dependency path.
//!
//! A dependency path is absolute, normalized and, when the file exists,
//! canonicalized through the file system so symlinked spellings collapse to one
//! key. It is the key space of both the resolve stack and the dependency cache.

use std::path::{Path, PathBuf};

use crate::core::InlineError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::models::EntityDescriptor;
use crate::utils::fs::{absolutize, normalize_path};

/// Canonicalize `path`, falling back to its lexical normalization when the file
/// system cannot resolve it (e.g., the file does not exist yet).
pub async fn canonicalize(path: &Path) -> PathBuf {
    match tokio::fs::canonicalize(path).await {
        Ok(canonical) => canonical,
        Err(e) => {
            tracing::trace!("Canonicalize failed for {}: {}", path.display(), e);
            normalize_path(path)
        }
    }
}

/// Resolves directive arguments relative to the importing file.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    require_extension: bool,
}

impl PathResolver {
    /// Create a resolver. With `require_extension` false, a final segment
    /// without an extension is completed from the directory listing.
    #[must_use]
    pub const fn new(require_extension: bool) -> Self {
        Self {
            require_extension,
        }
    }

    /// Resolve `raw_argument` against the directory of `referencing`.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::DependencyNotFound`] when extension inference is
    /// enabled and the parent directory cannot be listed or holds no entry
    /// whose name starts with the argument's base name.
    pub async fn resolve(
        &self,
        referencing: &EntityDescriptor,
        raw_argument: &str,
    ) -> Result<PathBuf, InlineError> {
        let joined = absolutize(referencing.dir(), Path::new(raw_argument.trim()));

        let resolved = if !self.require_extension && joined.extension().is_none() {
            infer_extension(&joined, &referencing.path).await?
        } else {
            joined
        };

        Ok(canonicalize(&resolved).await)
    }
}

/// Pick the first file (by name order) in `joined`'s parent whose name starts
/// with `joined`'s final segment.
async fn infer_extension(joined: &Path, referenced_by: &Path) -> Result<PathBuf, InlineError> {
    let not_found = |reason: String| InlineError::DependencyNotFound {
        path: joined.to_path_buf(),
        referenced_by: referenced_by.to_path_buf(),
        reason,
    };

    let (Some(parent), Some(stem)) = (joined.parent(), joined.file_name()) else {
        return Err(not_found("path has no file name".to_string()));
    };
    let stem = stem.to_string_lossy();

    let mut entries = tokio::fs::read_dir(parent)
        .await
        .with_file_context(FileOperation::ReadDir, parent, "inferring file extension", "resolver")
        .map_err(|e| e.into_dependency_not_found(referenced_by))?;

    let mut candidates = Vec::new();
    loop {
        let entry = entries
            .next_entry()
            .await
            .with_file_context(FileOperation::ReadDir, parent, "inferring file extension", "resolver")
            .map_err(|e| e.into_dependency_not_found(referenced_by))?;
        let Some(entry) = entry else {
            break;
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(stem.as_ref()) {
            continue;
        }
        // Directories can share the prefix; only files can be inlined
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            candidates.push(name);
        }
    }

    candidates.sort();
    match candidates.into_iter().next() {
        Some(name) => {
            tracing::debug!("Inferred {} for import '{}'", name, joined.display());
            Ok(parent.join(name))
        }
        None => Err(not_found(format!("no file in {} starts with '{}'", parent.display(), stem))),
    }
}
