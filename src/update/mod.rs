//! Re-resolving the files that depend on a changed file.
//!
//! Given a changed file (the primary), the dependency cache names every file
//! that imported it in an earlier pass. Each dependent is re-opened from disk
//! in the primary's mode (buffer or chunk stream), resolved again with the
//! matching executor, and handed to the caller.
//!
//! Which files are emitted depends on [`DependencyOutput`] in buffered mode:
//!
//! | policy | emitted |
//! |---|---|
//! | `primary` | the primary, unchanged; dependents are not re-resolved |
//! | `dependant` | the re-resolved dependents |
//! | `all` | the primary, then the re-resolved dependents |
//!
//! Streaming mode always emits the primary and its dependents.
//!
//! Dependents are processed in path order. The first failing dependent fails
//! the call; files emitted before it stay emitted.
//!
//! In streaming mode a dependent is only resolved as its stream is polled, so
//! the call itself fails only when a dependent cannot be re-opened. A
//! resolution failure arrives as the error item of that dependent's stream
//! (see [`stream_error`]); callers must drain every emitted stream to observe
//! it.
//!
//! [`stream_error`]: crate::executor::stream_error
//!
//! [`DependencyOutput`]: crate::config::DependencyOutput

use crate::constants::STREAM_CHUNK_SIZE;
use crate::core::InlineError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::engine::Inliner;
use crate::executor::validate_input;
use crate::models::{EntityDescriptor, FileContents, SourceFile};
use crate::utils::fs::open_chunked;

impl Inliner {
    /// Run the update workflow for `primary`, passing each emitted file to
    /// `emit` as soon as it is ready.
    ///
    /// A primary without content is emitted unchanged.
    ///
    /// # Errors
    ///
    /// - [`InlineError::InvalidInput`] if the primary has no path
    /// - the first dependent's re-open or resolution failure
    pub async fn update_dependents_with<F>(
        &self,
        primary: SourceFile,
        mut emit: F,
    ) -> Result<(), InlineError>
    where
        F: FnMut(SourceFile),
    {
        let Some(entity) = validate_input(&primary).await? else {
            emit(primary);
            return Ok(());
        };

        let streaming = primary.is_stream();
        let policy = self.options().dependency_output;
        let emit_primary = streaming || policy.emits_primary();
        let emit_dependents = streaming || policy.emits_dependents();

        if emit_primary {
            emit(primary);
        }
        if !emit_dependents {
            tracing::debug!(
                "Dependency output is '{:?}'; not re-resolving dependents of {}",
                policy,
                entity.path.display()
            );
            return Ok(());
        }

        let mut dependents: Vec<_> = self.lookup_dependents(&entity.path).await.into_iter().collect();
        dependents.sort();
        tracing::debug!("{} has {} dependent(s)", entity.path.display(), dependents.len());

        for dependent in dependents {
            let file = reopen(&dependent, streaming).await?;
            emit(self.run(file).await?);
        }
        Ok(())
    }

    /// Run the update workflow for `primary` and collect the emitted files.
    ///
    /// Unlike [`Inliner::update_dependents_with`], nothing is returned when a
    /// dependent fails.
    ///
    /// # Errors
    ///
    /// See [`Inliner::update_dependents_with`].
    pub async fn update_dependents(&self, primary: SourceFile) -> Result<Vec<SourceFile>, InlineError> {
        let mut emitted = Vec::new();
        self.update_dependents_with(primary, |file| emitted.push(file)).await?;
        Ok(emitted)
    }
}

async fn reopen(dependent: &EntityDescriptor, streaming: bool) -> Result<SourceFile, InlineError> {
    let contents = if streaming {
        FileContents::Stream(open_chunked(&dependent.path, STREAM_CHUNK_SIZE).await?)
    } else {
        let bytes = tokio::fs::read(&dependent.path).await.with_file_context(
            FileOperation::Read,
            &dependent.path,
            "re-opening dependent",
            "update",
        )?;
        FileContents::Buffer(bytes)
    };
    Ok(SourceFile::from_descriptor(dependent, contents))
}
