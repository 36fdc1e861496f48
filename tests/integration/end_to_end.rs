//! Buffered resolution through the public API.

use anyhow::Result;
use futures::future::join_all;
use inline_imports::test_utils::{TestProject, init_test_logging};
use inline_imports::{
    EntityDescriptor, InlineConfig, InlineError, InlineOptions, Inliner, ResolveStack, transform_fn,
};
use std::path::PathBuf;

fn inliner(config: InlineConfig) -> Result<Inliner> {
    Ok(Inliner::new(InlineOptions::from_config(&config)?))
}

async fn resolve(inliner: &Inliner, project: &TestProject, name: &str) -> Result<String> {
    let resolved = inliner.run(project.source_file(name)?).await?;
    Ok(String::from_utf8(resolved.into_bytes().await?)?)
}

#[tokio::test]
async fn test_lib_src_example() -> Result<()> {
    init_test_logging(None);
    let project = TestProject::new()?;
    project.write("lib.txt", "line one\nline two\n")?;
    project.write("src.txt", "header\n@import \"./lib.txt\";\nfooter\n")?;
    let inliner = inliner(InlineConfig::default())?;

    let out = resolve(&inliner, &project, "src.txt").await?;
    assert_eq!(out, "header\nline one\nline two\n\nfooter\n");

    let dependents = inliner.lookup_dependents(&project.path("lib.txt")).await;
    let paths: Vec<PathBuf> = dependents.into_iter().map(|d| d.path).collect();
    assert_eq!(paths, vec![project.path("src.txt")]);
    Ok(())
}

#[tokio::test]
async fn test_replacement_tokens_are_literal() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "price: $1, all: $&, named: ${x}, escaped: $$")?;
    project.write("src.txt", "import 'lib.txt'")?;

    let out = resolve(&inliner(InlineConfig::default())?, &project, "src.txt").await?;
    assert_eq!(out, "price: $1, all: $&, named: ${x}, escaped: $$");
    Ok(())
}

#[tokio::test]
async fn test_equivalent_spellings_share_a_cache_key() -> Result<()> {
    let project = TestProject::new()?;
    project.write("shared/lib.txt", "L")?;
    project.write("a.txt", "import './shared/lib.txt'")?;
    project.write("nested/b.txt", "import '../shared/./lib.txt'")?;
    let inliner = inliner(InlineConfig::default())?;

    assert_eq!(resolve(&inliner, &project, "a.txt").await?, "L");
    assert_eq!(resolve(&inliner, &project, "nested/b.txt").await?, "L");

    assert_eq!(inliner.cache().len(), 1);
    let dependents = inliner.lookup_dependents(&project.path("nested/../shared/lib.txt")).await;
    assert_eq!(dependents.len(), 2);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_spelling_collapses() -> Result<()> {
    let project = TestProject::new()?;
    project.write("real/lib.txt", "L")?;
    std::os::unix::fs::symlink(project.path("real"), project.path("alias"))?;
    project.write("a.txt", "import 'alias/lib.txt'\nimport 'real/lib.txt'")?;
    let inliner = inliner(InlineConfig::default())?;

    assert_eq!(resolve(&inliner, &project, "a.txt").await?, "L\n");
    assert_eq!(inliner.cache().len(), 1);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_importer_is_one_dependent() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    project.write("real/a.txt", "import '../lib.txt'")?;
    std::os::unix::fs::symlink(project.path("real"), project.path("alias"))?;
    let inliner = inliner(InlineConfig::default())?;

    assert_eq!(resolve(&inliner, &project, "real/a.txt").await?, "L");
    assert_eq!(resolve(&inliner, &project, "alias/a.txt").await?, "L");

    let dependents = inliner.lookup_dependents(&project.path("lib.txt")).await;
    let paths: Vec<PathBuf> = dependents.into_iter().map(|d| d.path).collect();
    assert_eq!(paths, vec![project.path("real/a.txt")]);
    Ok(())
}

#[tokio::test]
async fn test_import_once_per_pass() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    project.write("src.txt", "1\n@import \"lib.txt\";\n2\n@import \"./lib.txt\";\n3")?;
    let inliner = inliner(InlineConfig::default())?;

    assert_eq!(resolve(&inliner, &project, "src.txt").await?, "1\nL\n2\n\n3");
    // A second pass starts with a fresh stack
    assert_eq!(resolve(&inliner, &project, "src.txt").await?, "1\nL\n2\n\n3");
    Ok(())
}

#[tokio::test]
async fn test_recursive_inlining_order() -> Result<()> {
    let project = TestProject::new()?;
    project.write("src.txt", "<import 'a.txt'>")?;
    project.write("a.txt", "a(import 'parts/b.txt')")?;
    project.write("parts/b.txt", "b(import 'c.txt')")?;
    project.write("parts/c.txt", "c")?;

    let flat = inliner(InlineConfig::default())?;
    assert_eq!(resolve(&flat, &project, "src.txt").await?, "<a(import 'parts/b.txt')>");

    let deep = inliner(InlineConfig {
        recursive: Some(true),
        ..Default::default()
    })?;
    assert_eq!(resolve(&deep, &project, "src.txt").await?, "<a(b(c))>");
    Ok(())
}

#[tokio::test]
async fn test_recursive_cycle_is_reported() -> Result<()> {
    let project = TestProject::new()?;
    project.write("src.txt", "import 'src.txt'")?;
    let inliner = inliner(InlineConfig {
        recursive: Some(true),
        ..Default::default()
    })?;

    let err = inliner.run(project.source_file("src.txt")?).await.err().unwrap();
    assert!(matches!(err, InlineError::CircularImport { ref chain } if chain.len() == 2));
    Ok(())
}

#[tokio::test]
async fn test_failure_isolation_between_concurrent_files() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    project.write("good.txt", "import 'lib.txt'")?;
    project.write("bad.txt", "import 'missing.txt'")?;
    let inliner = inliner(InlineConfig::default())?;

    let results = join_all(["good.txt", "bad.txt"].map(|name| {
        let inliner = inliner.clone();
        let file = project.source_file(name);
        async move { inliner.run(file?).await.map_err(anyhow::Error::from) }
    }))
    .await;

    let mut results = results.into_iter();
    let good = results.next().unwrap()?;
    assert_eq!(good.into_bytes().await?, b"L");

    let bad = results.next().unwrap().err().unwrap();
    match bad.downcast_ref::<InlineError>() {
        Some(InlineError::DependencyNotFound { path, referenced_by, .. }) => {
            assert_eq!(path, &project.path("missing.txt"));
            assert_eq!(referenced_by, &project.path("bad.txt"));
        }
        other => panic!("expected DependencyNotFound, got {other:?}"),
    }
    assert_eq!(inliner.lookup_dependents(&project.path("lib.txt")).await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_custom_pattern_and_group() -> Result<()> {
    let project = TestProject::new()?;
    project.write("header.h", "// header")?;
    project.write("main.c", "#include \"header.h\"\nint main() {}")?;
    let inliner = inliner(InlineConfig {
        pattern: Some(r#"#(include)\s+"([^"]+)""#.to_string()),
        capture_group: Some(2),
        ..Default::default()
    })?;

    assert_eq!(resolve(&inliner, &project, "main.c").await?, "// header\nint main() {}");
    Ok(())
}

#[tokio::test]
async fn test_transform_hook_sees_dependency_identity() -> Result<()> {
    let project = TestProject::new()?;
    project.write("style.scss", "$c: red;")?;
    project.write("page.css", "@import \"style.scss\";")?;
    let base = project.root().to_path_buf();

    let inliner = inliner(InlineConfig::default())?.with_transform(transform_fn(
        move |dep: EntityDescriptor| {
            let base = base.clone();
            async move {
                assert_eq!(dep.base, base);
                let source = tokio::fs::read_to_string(&dep.path).await?;
                Ok::<_, anyhow::Error>(source.replace("$c", "color"))
            }
        },
    ));

    assert_eq!(resolve(&inliner, &project, "page.css").await?, "color: red;");
    Ok(())
}

#[tokio::test]
async fn test_substitute_with_caller_stack() -> Result<()> {
    let project = TestProject::new()?;
    project.write("lib.txt", "L")?;
    let inliner = inliner(InlineConfig::default())?;
    let entity = EntityDescriptor::new(project.root(), project.root(), "src.txt");
    let mut stack = ResolveStack::new();

    let first = inliner.substitute(&entity, "import 'lib.txt'", &mut stack).await?;
    let second = inliner.substitute(&entity, "import 'lib.txt'", &mut stack).await?;

    assert_eq!((first.as_str(), second.as_str()), ("L", ""));
    assert!(stack.contains(&project.path("lib.txt")));
    Ok(())
}
