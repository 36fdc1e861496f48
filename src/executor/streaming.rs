//! Chunk-by-chunk resolution.
//!
//! The output stream yields one transformed chunk per input chunk, in arrival
//! order, as soon as that chunk is resolved. All chunks of one file share a
//! resolve stack, so a dependency imported in an early chunk is dropped as a
//! repeat in later ones; the stack is cleared when the input ends.
//!
//! Chunks are decoded with a stateful decoder, so a multi-byte character split
//! across chunk boundaries is decoded correctly. Directives are matched within
//! a single decoded chunk only: a directive straddling two chunks is not
//! recognised.
//!
//! Failures surface as an `io::Error` item wrapping the [`InlineError`]; the
//! stream ends after it. Use [`stream_error`] to recover the typed error.

use futures::StreamExt;
use std::io;

use crate::core::InlineError;
use crate::encoding::ChunkDecoder;
use crate::engine::{Inliner, PassReport};
use crate::models::{ChunkStream, EntityDescriptor, FileContents, SourceFile};
use crate::resolver::ResolveStack;

use super::validate_input;

/// The resolution error carried by a failed stream item, if any.
#[must_use]
pub fn stream_error(error: &io::Error) -> Option<&InlineError> {
    error.get_ref().and_then(|inner| inner.downcast_ref::<InlineError>())
}

struct StreamState {
    inliner: Inliner,
    entity: EntityDescriptor,
    input: ChunkStream,
    decoder: ChunkDecoder,
    stack: ResolveStack,
    report: PassReport,
    done: bool,
}

impl StreamState {
    async fn resolve(&mut self, text: &str) -> io::Result<Vec<u8>> {
        let resolved = self
            .inliner
            .substitute_counted(&self.entity, text, &mut self.stack, &mut self.report)
            .await
            .map_err(io::Error::other)?;
        Ok(self.inliner.options().encoding.encode(&resolved))
    }

    async fn next_chunk(mut self) -> io::Result<Option<(Vec<u8>, Self)>> {
        if self.done {
            return Ok(None);
        }

        while let Some(chunk) = self.input.next().await {
            let text = self.decoder.decode_chunk(&chunk?, false);
            if text.is_empty() {
                continue;
            }
            let encoded = self.resolve(&text).await?;
            return Ok(Some((encoded, self)));
        }

        let tail = self.decoder.decode_chunk(&[], true);
        let encoded = if tail.is_empty() {
            None
        } else {
            Some(self.resolve(&tail).await?)
        };

        self.done = true;
        self.stack.clear();
        self.inliner.log_completion(&self.entity.path, &self.report);

        Ok(encoded.map(|bytes| (bytes, self)))
    }
}

impl Inliner {
    /// Resolve a streamed file, returning it with a transformed stream.
    ///
    /// Nothing is read until the returned stream is polled.
    ///
    /// # Errors
    ///
    /// [`InlineError::InvalidInput`] if the file has no path or holds a buffer.
    /// Dependency failures are reported through the stream.
    pub async fn run_streaming(&self, mut file: SourceFile) -> Result<SourceFile, InlineError> {
        let Some(entity) = validate_input(&file).await? else {
            return Ok(file);
        };

        let input = match std::mem::take(&mut file.contents) {
            FileContents::Stream(input) => input,
            other => {
                file.contents = other;
                return Err(InlineError::InvalidInput {
                    reason: format!("{} holds buffered content", entity.path.display()),
                });
            }
        };

        let state = StreamState {
            inliner: self.clone(),
            decoder: self.options().encoding.chunk_decoder(),
            entity,
            input,
            stack: ResolveStack::new(),
            report: PassReport::default(),
            done: false,
        };

        let output = futures::stream::try_unfold(state, StreamState::next_chunk);
        file.contents = FileContents::Stream(output.boxed());
        Ok(file)
    }
}
