//! The file representation the inliner consumes and produces.
//!
//! A [`SourceFile`] models a file travelling through a build pipeline: its
//! identity (working directory, base directory, path) and exactly one view of
//! its content. [`FileContents`] makes the buffer and stream views mutually
//! exclusive by construction. The executors only read the identity and replace
//! the content view.
//!
//! [`EntityDescriptor`] is the identity alone. The dependency cache stores
//! descriptors so dependents can be re-opened from disk later.

use futures::TryStreamExt;
use futures::stream::BoxStream;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::fs::absolutize;

/// A sequence of content chunks.
pub type ChunkStream = BoxStream<'static, std::io::Result<Vec<u8>>>;

/// Content view of a [`SourceFile`].
#[derive(Default)]
pub enum FileContents {
    /// No content (e.g., a directory entry). Passed through untouched.
    #[default]
    Null,
    /// The whole content as one buffer
    Buffer(Vec<u8>),
    /// The content as a sequence of chunks
    Stream(ChunkStream),
}

impl fmt::Debug for FileContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Self::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

/// Identity of a file, sufficient to re-open it later.
///
/// `path` is always absolute and normalized, so two descriptors for the same
/// file compare equal however the file was first named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityDescriptor {
    /// Working directory the file was opened from
    pub cwd: PathBuf,
    /// Base directory used to compute the file's relative output name
    pub base: PathBuf,
    /// Absolute path of the file
    pub path: PathBuf,
}

impl EntityDescriptor {
    /// Create a descriptor, making `path` and `base` absolute against `cwd`.
    pub fn new(cwd: impl Into<PathBuf>, base: impl AsRef<Path>, path: impl AsRef<Path>) -> Self {
        let cwd = cwd.into();
        Self {
            base: absolutize(&cwd, base.as_ref()),
            path: absolutize(&cwd, path.as_ref()),
            cwd,
        }
    }

    /// Directory containing the file; relative imports resolve against it.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// Path relative to `base`, falling back to the file name.
    #[must_use]
    pub fn relative(&self) -> PathBuf {
        self.path.strip_prefix(&self.base).map(Path::to_path_buf).unwrap_or_else(|_| {
            self.path.file_name().map(PathBuf::from).unwrap_or_else(|| self.path.clone())
        })
    }
}

/// A file with identity and one content view.
#[derive(Debug)]
pub struct SourceFile {
    /// Working directory
    pub cwd: PathBuf,
    /// Base directory (defaults to `cwd`)
    pub base: PathBuf,
    /// Source path; `None` means the file has no known origin
    pub path: Option<PathBuf>,
    /// Content view
    pub contents: FileContents,
}

impl SourceFile {
    /// A file whose content is a single buffer. `base` defaults to `cwd`.
    pub fn buffered(cwd: impl Into<PathBuf>, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        let cwd = cwd.into();
        Self {
            base: cwd.clone(),
            cwd,
            path: Some(path.into()),
            contents: FileContents::Buffer(bytes.into()),
        }
    }

    /// A file whose content is a chunk stream. `base` defaults to `cwd`.
    pub fn streamed(cwd: impl Into<PathBuf>, path: impl Into<PathBuf>, chunks: ChunkStream) -> Self {
        let cwd = cwd.into();
        Self {
            base: cwd.clone(),
            cwd,
            path: Some(path.into()),
            contents: FileContents::Stream(chunks),
        }
    }

    /// Rebuild a file from a cached descriptor with the given content.
    #[must_use]
    pub fn from_descriptor(descriptor: &EntityDescriptor, contents: FileContents) -> Self {
        Self {
            cwd: descriptor.cwd.clone(),
            base: descriptor.base.clone(),
            path: Some(descriptor.path.clone()),
            contents,
        }
    }

    /// Set the base directory.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Descriptor for this file, or `None` if it has no path.
    #[must_use]
    pub fn descriptor(&self) -> Option<EntityDescriptor> {
        self.path.as_ref().map(|path| EntityDescriptor::new(self.cwd.clone(), &self.base, path))
    }

    /// Whether the file has no content view at all.
    ///
    /// An empty buffer is still content: it is resolved (trivially) and its
    /// dependents are still looked up.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.contents, FileContents::Null)
    }

    /// Whether the content is a chunk stream.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, FileContents::Stream(_))
    }

    /// Consume the file and return its full content, draining a stream if needed.
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self.contents {
            FileContents::Null => Ok(Vec::new()),
            FileContents::Buffer(bytes) => Ok(bytes),
            FileContents::Stream(stream) => {
                let chunks: Vec<Vec<u8>> = stream.try_collect().await?;
                Ok(chunks.concat())
            }
        }
    }
}
