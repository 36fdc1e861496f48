//! Streamed resolution and its equivalence with buffered mode.

use anyhow::Result;
use futures::{StreamExt, TryStreamExt};
use inline_imports::executor::stream_error;
use inline_imports::test_utils::TestProject;
use inline_imports::utils::fs::open_chunked;
use inline_imports::{FileContents, InlineError, InlineOptions, Inliner, SourceFile};

async fn streamed(project: &TestProject, name: &str, chunk_size: usize) -> Result<SourceFile> {
    let chunks = open_chunked(&project.path(name), chunk_size).await?;
    Ok(SourceFile::streamed(project.root(), name, chunks))
}

#[tokio::test]
async fn test_single_chunk_matches_buffered() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "shared\n")?;
    project.write("other.txt", "other\n")?;
    project.write(
        "src.txt",
        "a\n@import \"lib.txt\";\nb\nimport 'other.txt'\nc\n@import \"./lib.txt\";\n",
    )?;
    let inliner = Inliner::new(InlineOptions::default());

    let buffered = inliner.run(project.source_file("src.txt")?).await?.into_bytes().await?;
    let streamed = inliner.run(streamed(&project, "src.txt", 1 << 20).await?).await?;
    assert!(streamed.is_stream());

    assert_eq!(streamed.into_bytes().await?, buffered);
    Ok(())
}

#[tokio::test]
async fn test_line_chunks_share_import_once() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    let inliner = Inliner::new(InlineOptions::default());

    let lines: Vec<std::io::Result<Vec<u8>>> = ["import 'lib.txt'\n", "mid\n", "import 'lib.txt'\n"]
        .iter()
        .map(|line| Ok(line.as_bytes().to_vec()))
        .collect();
    let file = SourceFile::streamed(project.root(), "src.txt", futures::stream::iter(lines).boxed());

    let FileContents::Stream(out) = inliner.run(file).await?.contents else {
        panic!("expected stream output");
    };
    let chunks: Vec<Vec<u8>> = out.try_collect().await?;
    assert_eq!(chunks, vec![b"L\n".to_vec(), b"mid\n".to_vec(), b"\n".to_vec()]);
    Ok(())
}

#[tokio::test]
async fn test_multibyte_content_across_small_chunks() -> Result<()> {
    let project = TestProject::new()?;
    let text = "日本語のテキスト ✓ ünïcödé\n".repeat(8);
    project.write("src.txt", &text)?;
    let inliner = Inliner::new(InlineOptions::default());

    let out = inliner.run(streamed(&project, "src.txt", 5).await?).await?.into_bytes().await?;
    assert_eq!(String::from_utf8(out)?, text);
    Ok(())
}

#[tokio::test]
async fn test_missing_dependency_fails_the_stream() -> Result<()> {
    let project = TestProject::new()?;
    project.write("src.txt", "import 'missing.txt'\n")?;
    let inliner = Inliner::new(InlineOptions::default());

    let err = inliner
        .run(streamed(&project, "src.txt", 1024).await?)
        .await?
        .into_bytes()
        .await
        .unwrap_err();

    assert!(matches!(stream_error(&err), Some(InlineError::DependencyNotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn test_nothing_is_read_until_polled() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    project.write("src.txt", "import 'lib.txt'")?;
    let inliner = Inliner::new(InlineOptions::default());

    let file = inliner.run(streamed(&project, "src.txt", 64).await?).await?;
    assert!(inliner.cache().is_empty());

    assert_eq!(file.into_bytes().await?, b"L");
    assert_eq!(inliner.cache().len(), 1);
    Ok(())
}
