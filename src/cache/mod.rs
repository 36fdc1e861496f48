//! Reverse dependency cache.
//!
//! Maps a dependency's canonical path to the set of distinct files that
//! imported it. Every resolution pass writes to it; the update workflow reads
//! it to find what must be rebuilt when a dependency changes.
//!
//! # Concurrency
//!
//! Independent files are resolved concurrently and may record the same
//! dependency at the same time. The map is a [`DashMap`], so inserts into the
//! per-key set happen under that key's shard lock without a global lock.
//! Clones share the same underlying map.
//!
//! # Lifecycle
//!
//! The cache starts empty, only grows, and lives as long as the owning
//! [`Inliner`](crate::Inliner). A file that stops importing a dependency stays
//! listed as its dependent; [`DependencyCache::clear`] is the only reset.

use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::EntityDescriptor;

/// Process-lifetime map from dependency path to the files that import it.
#[derive(Debug, Clone, Default)]
pub struct DependencyCache {
    entries: Arc<DashMap<PathBuf, HashSet<EntityDescriptor>>>,
}

impl DependencyCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` imports `dependency`.
    ///
    /// Returns `false` if the pair was already recorded.
    pub fn record(&self, dependency: PathBuf, dependent: EntityDescriptor) -> bool {
        let inserted = self.entries.entry(dependency.clone()).or_default().insert(dependent);
        if inserted {
            tracing::trace!("Recorded new dependent of {}", dependency.display());
        }
        inserted
    }

    /// Files that import `dependency` (a canonical path), or an empty set.
    #[must_use]
    pub fn lookup_dependents(&self, dependency: &Path) -> HashSet<EntityDescriptor> {
        self.entries.get(dependency).map(|set| set.value().clone()).unwrap_or_default()
    }

    /// Every dependency with its dependents, sorted for stable display.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<PathBuf, BTreeSet<EntityDescriptor>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().iter().cloned().collect()))
            .collect()
    }

    /// Number of distinct dependencies recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
