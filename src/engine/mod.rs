//! The substitution engine.
//!
//! [`Inliner`] owns the validated options, the path resolver, the content
//! source and the dependency cache. A resolution pass over one piece of content
//! works in three steps:
//!
//! 1. Scan the content for directives ([`scan_directives`]), recording their
//!    byte spans in the original text.
//! 2. Resolve each directive's path, apply the import-once policy against the
//!    pass's [`ResolveStack`], then load the dependency's content (and, with
//!    recursive imports, resolve that content's own directives first).
//! 3. Build the output in one pass: untouched spans are copied, dependency
//!    content is spliced in literally at the directive's span.
//!
//! Each inlined dependency is recorded in the [`DependencyCache`] against the
//! file that referenced it.
//!
//! # Recursive imports
//!
//! Each nested level gets a fresh resolve stack and carries the chain of files
//! above it. A dependency that appears in its own chain fails with
//! [`InlineError::CircularImport`]; a chain longer than `max_depth` fails with
//! [`InlineError::MaxDepthExceeded`].

mod directive;

pub use directive::{Directive, scan_directives};

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::DependencyCache;
use crate::config::InlineOptions;
use crate::core::InlineError;
use crate::models::EntityDescriptor;
use crate::resolver::{PathResolver, ResolveStack, canonicalize};
use crate::source::{ContentSource, TransformHook};

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Directives replaced by dependency content
    pub inlined: usize,
    /// Directives dropped by the import-once policy
    pub repeated: usize,
}

/// Import-directive inliner.
///
/// Cheap to clone; clones share options, hook and dependency cache, so one
/// `Inliner` can drive many concurrent passes.
#[derive(Debug, Clone)]
pub struct Inliner {
    options: Arc<InlineOptions>,
    resolver: PathResolver,
    source: ContentSource,
    cache: DependencyCache,
}

impl Inliner {
    /// Create an inliner with an empty dependency cache.
    #[must_use]
    pub fn new(options: InlineOptions) -> Self {
        Self {
            resolver: PathResolver::new(options.require_extension),
            source: ContentSource::new(options.encoding, options.hook_timeout),
            cache: DependencyCache::new(),
            options: Arc::new(options),
        }
    }

    /// Obtain dependency content from `hook` instead of reading files.
    #[must_use]
    pub fn with_transform(mut self, hook: Arc<dyn TransformHook>) -> Self {
        self.source = self.source.with_hook(hook);
        self
    }

    /// Share an existing dependency cache.
    #[must_use]
    pub fn with_cache(mut self, cache: DependencyCache) -> Self {
        self.cache = cache;
        self
    }

    /// The options this inliner was built with.
    #[must_use]
    pub fn options(&self) -> &InlineOptions {
        &self.options
    }

    /// The dependency cache populated by resolution passes.
    #[must_use]
    pub fn cache(&self) -> &DependencyCache {
        &self.cache
    }

    /// Files known to import `dependency`, however it is spelled.
    pub async fn lookup_dependents(&self, dependency: &Path) -> HashSet<EntityDescriptor> {
        self.cache.lookup_dependents(&canonicalize(dependency).await)
    }

    /// Replace every directive in `content` with the content it references.
    ///
    /// `referencing` is the file `content` belongs to; relative directive paths
    /// resolve against its directory. `stack` holds the paths already inlined
    /// in this pass and is updated in place.
    ///
    /// # Errors
    ///
    /// Fails on the first directive whose dependency cannot be resolved or
    /// loaded. No partial output is returned.
    pub async fn substitute(
        &self,
        referencing: &EntityDescriptor,
        content: &str,
        stack: &mut ResolveStack,
    ) -> Result<String, InlineError> {
        let mut report = PassReport::default();
        self.substitute_counted(referencing, content, stack, &mut report).await
    }

    pub(crate) async fn substitute_counted(
        &self,
        referencing: &EntityDescriptor,
        content: &str,
        stack: &mut ResolveStack,
        report: &mut PassReport,
    ) -> Result<String, InlineError> {
        let chain = vec![referencing.path.clone()];
        self.substitute_level(referencing, content, stack, &chain, report).await
    }

    fn substitute_level<'a>(
        &'a self,
        referencing: &'a EntityDescriptor,
        content: &'a str,
        stack: &'a mut ResolveStack,
        chain: &'a [PathBuf],
        report: &'a mut PassReport,
    ) -> BoxFuture<'a, Result<String, InlineError>> {
        async move {
            let directives =
                scan_directives(&self.options.pattern, self.options.capture_group, content);
            if directives.is_empty() {
                return Ok(content.to_string());
            }

            let mut output = String::with_capacity(content.len());
            let mut cursor = 0;

            for directive in directives {
                output.push_str(&content[cursor..directive.span.start]);
                cursor = directive.span.end;

                let path = self.resolver.resolve(referencing, &directive.argument).await?;

                if self.options.import_once && stack.contains(&path) {
                    report.repeated += 1;
                    self.log_repeat(&path, &referencing.path);
                    continue;
                }
                stack.push(path.clone());

                let dependency =
                    EntityDescriptor::new(referencing.cwd.clone(), &referencing.base, &path);
                let loaded = self.source.load(&dependency, &referencing.path).await?;

                if self.options.recursive {
                    let nested_chain = self.descend(chain, &path)?;
                    let mut nested_stack = ResolveStack::new();
                    let resolved = self
                        .substitute_level(
                            &dependency,
                            &loaded,
                            &mut nested_stack,
                            &nested_chain,
                            &mut *report,
                        )
                        .await?;
                    output.push_str(&resolved);
                } else {
                    output.push_str(&loaded);
                }

                report.inlined += 1;
                tracing::debug!(
                    "Inlined {} into {}",
                    path.display(),
                    referencing.path.display()
                );
                self.cache.record(path, referencing.clone());
            }

            output.push_str(&content[cursor..]);
            Ok(output)
        }
        .boxed()
    }

    /// Chain for a nested level, checked for cycles and depth.
    fn descend(&self, chain: &[PathBuf], dependency: &Path) -> Result<Vec<PathBuf>, InlineError> {
        let mut nested = chain.to_vec();
        nested.push(dependency.to_path_buf());

        if chain.iter().any(|ancestor| ancestor == dependency) {
            return Err(InlineError::CircularImport {
                chain: nested,
            });
        }
        // The chain includes the outermost file, which is not an import level
        if chain.len() > self.options.max_depth {
            return Err(InlineError::MaxDepthExceeded {
                max_depth: self.options.max_depth,
                path: dependency.to_path_buf(),
            });
        }
        Ok(nested)
    }

    fn log_repeat(&self, dependency: &Path, referenced_by: &Path) {
        if self.options.log.repeats {
            tracing::warn!(
                "Repeated import of {} in {} was skipped",
                dependency.display(),
                referenced_by.display()
            );
        } else {
            tracing::debug!(
                "Repeated import of {} in {} was skipped",
                dependency.display(),
                referenced_by.display()
            );
        }
    }

    pub(crate) fn log_completion(&self, file: &Path, report: &PassReport) {
        if self.options.log.completion {
            tracing::info!(
                "Resolved {} ({} inlined, {} repeated)",
                file.display(),
                report.inlined,
                report.repeated
            );
        } else {
            tracing::debug!(
                "Resolved {} ({} inlined, {} repeated)",
                file.display(),
                report.inlined,
                report.repeated
            );
        }
    }
}
