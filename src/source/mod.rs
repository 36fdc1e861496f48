//! Loading the content of a resolved dependency.
//!
//! By default a dependency's content is its file, read in full and decoded with
//! the configured encoding. A [`TransformHook`] replaces that: the hook is
//! handed the dependency's descriptor and returns the text to inline, e.g. the
//! output of a compiler or minifier the caller runs on the file. The inliner
//! does not look inside the hook; it only awaits its result, bounded by the
//! configured timeout.
//!
//! # Example
//!
//! ```rust,no_run
//! use inline_imports::{InlineOptions, Inliner};
//! use inline_imports::source::transform_fn;
//!
//! let inliner = Inliner::new(InlineOptions::default()).with_transform(transform_fn(
//!     |dependency| async move {
//!         let text = tokio::fs::read_to_string(&dependency.path).await?;
//!         Ok::<_, anyhow::Error>(text.to_uppercase())
//!     },
//! ));
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::InlineError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::encoding::TextCodec;
use crate::models::EntityDescriptor;

/// Produces a dependency's content in place of reading its file.
pub trait TransformHook: Send + Sync {
    /// Produce the fully materialized text for `dependency`.
    fn transform(&self, dependency: EntityDescriptor) -> BoxFuture<'static, anyhow::Result<String>>;
}

/// [`TransformHook`] adapter for async closures; see [`transform_fn`].
pub struct FnHook<F>(F);

impl<F, Fut> TransformHook for FnHook<F>
where
    F: Fn(EntityDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    fn transform(&self, dependency: EntityDescriptor) -> BoxFuture<'static, anyhow::Result<String>> {
        (self.0)(dependency).boxed()
    }
}

/// Wrap an async closure as a shareable [`TransformHook`].
pub fn transform_fn<F, Fut>(f: F) -> Arc<dyn TransformHook>
where
    F: Fn(EntityDescriptor) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    Arc::new(FnHook(f))
}

/// Where dependency content comes from.
#[derive(Clone)]
pub struct ContentSource {
    encoding: TextCodec,
    hook: Option<Arc<dyn TransformHook>>,
    hook_timeout: Duration,
}

impl std::fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSource")
            .field("encoding", &self.encoding.name())
            .field("hook", &self.hook.is_some())
            .field("hook_timeout", &self.hook_timeout)
            .finish()
    }
}

impl ContentSource {
    /// Read dependencies from disk with `encoding`.
    #[must_use]
    pub fn new(encoding: TextCodec, hook_timeout: Duration) -> Self {
        Self {
            encoding,
            hook: None,
            hook_timeout,
        }
    }

    /// Use `hook` instead of reading files.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn TransformHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Load the text to inline for `dependency`.
    ///
    /// # Errors
    ///
    /// - [`InlineError::DependencyNotFound`] if the file cannot be read
    /// - [`InlineError::HookFailure`] if the hook errors or exceeds the timeout
    pub async fn load(
        &self,
        dependency: &EntityDescriptor,
        referenced_by: &Path,
    ) -> Result<String, InlineError> {
        match &self.hook {
            Some(hook) => self.run_hook(hook.as_ref(), dependency, referenced_by).await,
            None => {
                let bytes = tokio::fs::read(&dependency.path)
                    .await
                    .with_file_context(
                        FileOperation::Read,
                        &dependency.path,
                        "inlining dependency",
                        "content_source",
                    )
                    .map_err(|e| e.into_dependency_not_found(referenced_by))?;
                Ok(self.encoding.decode(&bytes))
            }
        }
    }

    async fn run_hook(
        &self,
        hook: &dyn TransformHook,
        dependency: &EntityDescriptor,
        referenced_by: &Path,
    ) -> Result<String, InlineError> {
        let failure = |reason: String| InlineError::HookFailure {
            path: dependency.path.clone(),
            referenced_by: referenced_by.to_path_buf(),
            reason,
        };

        match tokio::time::timeout(self.hook_timeout, hook.transform(dependency.clone())).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(failure(format!("{e:#}"))),
            Err(_) => Err(failure(format!("no result after {:?}", self.hook_timeout))),
        }
    }
}
