//! The per-pass set of already-resolved dependency paths.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Ordered set of dependency paths resolved during one resolution pass.
///
/// A buffered pass owns a fresh stack; a streamed file shares one stack
/// across all its chunks and clears it when the stream ends. Each level of a
/// recursive import gets its own stack.
#[derive(Debug, Clone, Default)]
pub struct ResolveStack {
    paths: IndexSet<PathBuf>,
}

impl ResolveStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` was already resolved in this pass.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Record `path`; returns `false` if it was already present.
    pub fn push(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    /// Number of distinct paths recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Forget every recorded path.
    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
