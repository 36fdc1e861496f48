//! File system helpers shared by the resolver, the executors and the CLI.

use futures::StreamExt;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::core::file_error::{FileOperation, FileOperationError, FileResultExt};
use crate::models::ChunkStream;

/// Normalizes a path by resolving `.` and `..` components lexically.
///
/// No file system access; symlinks are not followed.
///
/// # Examples
///
/// ```rust
/// use inline_imports::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// let path = Path::new("/foo/./bar/../baz");
/// assert_eq!(normalize_path(path), PathBuf::from("/foo/baz"));
///
/// let relative = Path::new("../src/./lib.rs");
/// assert_eq!(normalize_path(relative), PathBuf::from("../src/lib.rs"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Make `path` absolute against `cwd` and normalize it lexically.
#[must_use]
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&cwd.join(path))
    }
}

/// Open a file as a stream of chunks of at most `chunk_size` bytes.
///
/// The file is opened eagerly so a missing file fails here rather than on the
/// first poll.
pub async fn open_chunked(
    path: &Path,
    chunk_size: usize,
) -> Result<ChunkStream, FileOperationError> {
    let file = tokio::fs::File::open(path).await.with_file_context(
        FileOperation::Open,
        path,
        "streaming file content",
        "utils::fs",
    )?;

    let chunk_size = chunk_size.max(1);
    let stream = futures::stream::try_unfold(file, move |mut file| async move {
        let mut buf = vec![0u8; chunk_size];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        buf.truncate(read);
        Ok(Some((buf, file)))
    });

    Ok(stream.boxed())
}

/// Writes bytes to a file atomically: write a sibling temp file, then rename.
///
/// Parent directories are created if needed.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<(), FileOperationError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.with_file_context(
            FileOperation::CreateDir,
            parent,
            "creating output directory",
            "utils::fs",
        )?;
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, content).await.with_file_context(
        FileOperation::Write,
        &temp_path,
        "writing output",
        "utils::fs",
    )?;

    tokio::fs::rename(&temp_path, path).await.with_file_context(
        FileOperation::Write,
        path,
        "renaming temp file into place",
        "utils::fs",
    )
}
