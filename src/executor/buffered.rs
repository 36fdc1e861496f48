//! Whole-buffer resolution.

use crate::core::InlineError;
use crate::engine::{Inliner, PassReport};
use crate::models::{FileContents, SourceFile};
use crate::resolver::ResolveStack;

use super::validate_input;

impl Inliner {
    /// Resolve every directive in a buffered file.
    ///
    /// The buffer is decoded, substituted once with a fresh resolve stack and
    /// re-encoded. Identity fields are returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`InlineError::InvalidInput`] if the file has no path or holds a stream
    /// - any dependency failure from the substitution pass
    pub async fn run_buffered(&self, mut file: SourceFile) -> Result<SourceFile, InlineError> {
        let Some(entity) = validate_input(&file).await? else {
            return Ok(file);
        };

        let FileContents::Buffer(bytes) = &file.contents else {
            return Err(InlineError::InvalidInput {
                reason: format!("{} holds streamed content", entity.path.display()),
            });
        };

        let encoding = self.options().encoding;
        let text = encoding.decode(bytes);
        let mut stack = ResolveStack::new();
        let mut report = PassReport::default();

        let resolved = self.substitute_counted(&entity, &text, &mut stack, &mut report).await?;
        self.log_completion(&entity.path, &report);

        file.contents = FileContents::Buffer(encoding.encode(&resolved));
        Ok(file)
    }
}
