//! Text encoding for buffer and stream content.
//!
//! Content enters the inliner as bytes and is matched as text, so every
//! executor decodes with the configured encoding and re-encodes the result.
//! Labels follow the WHATWG Encoding Standard (`utf-8`, `utf-16le`,
//! `windows-1252`, `latin1`, ...).
//!
//! Encoders for UTF-16 do not exist in the standard; text configured as
//! UTF-16 is decoded as such but written back as UTF-8.

use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

use crate::core::InlineError;

/// A resolved text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    encoding: &'static Encoding,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::utf8()
    }
}

impl TextCodec {
    /// UTF-8, the default encoding.
    #[must_use]
    pub fn utf8() -> Self {
        Self {
            encoding: UTF_8,
        }
    }

    /// Look up an encoding by label (case-insensitive, surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnknownEncoding`] if the label is not recognised.
    pub fn for_label(label: &str) -> Result<Self, InlineError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self {
                encoding,
            })
            .ok_or_else(|| InlineError::UnknownEncoding {
                label: label.to_string(),
            })
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode a complete buffer. A leading byte order mark is dropped and
    /// malformed sequences become U+FFFD.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _had_errors) = self.encoding.decode_with_bom_removal(bytes);
        text.into_owned()
    }

    /// Encode text for output.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _used, _had_unmappable) = self.encoding.encode(text);
        bytes.into_owned()
    }

    /// Create a stateful decoder for chunked input.
    #[must_use]
    pub fn chunk_decoder(&self) -> ChunkDecoder {
        ChunkDecoder {
            decoder: self.encoding.new_decoder_with_bom_removal(),
        }
    }
}

/// Incremental decoder that carries partial characters across chunk boundaries.
pub struct ChunkDecoder {
    decoder: Decoder,
}

impl ChunkDecoder {
    /// Decode one chunk. Pass `last = true` for the final call so pending
    /// bytes of an incomplete character are flushed.
    pub fn decode_chunk(&mut self, bytes: &[u8], last: bool) -> String {
        let mut out = String::new();
        let mut input = bytes;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len().saturating_mul(3) + 16);
            out.reserve(needed);
            let (result, read, _had_errors) = self.decoder.decode_to_string(input, &mut out, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
        out
    }
}

impl std::fmt::Debug for ChunkDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkDecoder").field("encoding", &self.decoder.encoding().name()).finish()
    }
}
