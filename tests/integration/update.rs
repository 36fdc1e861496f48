//! The dependency cache and the update workflow.

use anyhow::Result;
use inline_imports::test_utils::TestProject;
use inline_imports::utils::fs::open_chunked;
use inline_imports::{DependencyOutput, InlineConfig, InlineOptions, Inliner, SourceFile};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn project() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write("partials/header.html", "<h1>v1</h1>")?;
    project.write("pages/home.html", "@import \"../partials/header.html\";\n<p>home</p>")?;
    project.write("pages/about.html", "@import \"../partials/header.html\";\n<p>about</p>")?;
    project.write("pages/plain.html", "<p>no imports</p>")?;
    Ok(project)
}

async fn primed(project: &TestProject, policy: DependencyOutput) -> Result<Inliner> {
    let inliner = Inliner::new(InlineOptions::from_config(&InlineConfig {
        dependency_output: Some(policy),
        ..Default::default()
    })?);
    for page in ["pages/home.html", "pages/about.html", "pages/plain.html"] {
        inliner.run(project.source_file(page)?).await?;
    }
    Ok(inliner)
}

fn paths(files: &[SourceFile]) -> Vec<PathBuf> {
    files.iter().filter_map(|f| f.descriptor()).map(|d| d.relative()).collect()
}

#[tokio::test]
async fn test_cache_lists_every_distinct_dependent() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::Primary).await?;
    // Resolving the same file again adds nothing
    inliner.run(project.source_file("pages/home.html")?).await?;

    let dependents: BTreeSet<PathBuf> = inliner
        .lookup_dependents(&project.path("partials/header.html"))
        .await
        .into_iter()
        .map(|d| d.path)
        .collect();
    let expected: BTreeSet<PathBuf> =
        [project.path("pages/about.html"), project.path("pages/home.html")].into_iter().collect();
    assert_eq!(dependents, expected);
    Ok(())
}

#[tokio::test]
async fn test_policies() -> Result<()> {
    let project = project()?;
    let header = || project.source_file("partials/header.html");

    let primary = primed(&project, DependencyOutput::Primary).await?;
    assert_eq!(
        paths(&primary.update_dependents(header()?).await?),
        vec![PathBuf::from("partials/header.html")]
    );

    let dependant = primed(&project, DependencyOutput::Dependant).await?;
    assert_eq!(
        paths(&dependant.update_dependents(header()?).await?),
        vec![PathBuf::from("pages/about.html"), PathBuf::from("pages/home.html")]
    );

    let all = primed(&project, DependencyOutput::All).await?;
    assert_eq!(
        paths(&all.update_dependents(header()?).await?),
        vec![
            PathBuf::from("partials/header.html"),
            PathBuf::from("pages/about.html"),
            PathBuf::from("pages/home.html")
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_dependents_pick_up_the_change() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::Dependant).await?;
    project.write("partials/header.html", "<h1>v2</h1>")?;

    let updated = inliner.update_dependents(project.source_file("partials/header.html")?).await?;
    let mut contents = Vec::new();
    for file in updated {
        contents.push(String::from_utf8(file.into_bytes().await?)?);
    }

    assert_eq!(contents, vec!["<h1>v2</h1>\n<p>about</p>", "<h1>v2</h1>\n<p>home</p>"]);
    Ok(())
}

#[tokio::test]
async fn test_emptied_dependency_still_updates_dependents() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::Dependant).await?;
    project.write("partials/header.html", "")?;

    let buffered = inliner.update_dependents(project.source_file("partials/header.html")?).await?;
    assert_eq!(
        paths(&buffered),
        vec![PathBuf::from("pages/about.html"), PathBuf::from("pages/home.html")]
    );
    let mut contents = Vec::new();
    for file in buffered {
        contents.push(String::from_utf8(file.into_bytes().await?)?);
    }
    assert_eq!(contents, vec!["\n<p>about</p>", "\n<p>home</p>"]);

    let chunks = open_chunked(&project.path("partials/header.html"), 4).await?;
    let streamed = inliner
        .update_dependents(SourceFile::streamed(project.root(), "partials/header.html", chunks))
        .await?;
    assert_eq!(streamed.len(), 3);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_dependent_named_through_symlink_is_cached_once() -> Result<()> {
    let project = project()?;
    std::os::unix::fs::symlink(project.path("pages"), project.path("alias"))?;
    let inliner = primed(&project, DependencyOutput::Dependant).await?;
    inliner.run(project.source_file("alias/home.html")?).await?;

    let dependents = inliner.lookup_dependents(&project.path("partials/header.html")).await;
    assert_eq!(dependents.len(), 2);

    let updated = inliner.update_dependents(project.source_file("partials/header.html")?).await?;
    assert_eq!(
        paths(&updated),
        vec![PathBuf::from("pages/about.html"), PathBuf::from("pages/home.html")]
    );
    Ok(())
}

#[tokio::test]
async fn test_streamed_primary_streams_dependents() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::Primary).await?;

    let chunks = open_chunked(&project.path("partials/header.html"), 4).await?;
    let primary = SourceFile::streamed(project.root(), "partials/header.html", chunks);
    let updated = inliner.update_dependents(primary).await?;

    assert_eq!(updated.len(), 3);
    assert!(updated.iter().all(SourceFile::is_stream));

    let mut contents = Vec::new();
    for file in updated {
        contents.push(String::from_utf8(file.into_bytes().await?)?);
    }
    assert_eq!(
        contents,
        vec!["<h1>v1</h1>", "<h1>v1</h1>\n<p>about</p>", "<h1>v1</h1>\n<p>home</p>"]
    );
    Ok(())
}

#[tokio::test]
async fn test_failing_dependent_keeps_earlier_emissions() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::All).await?;
    // about.html sorts first and now references a missing file
    project.write("pages/about.html", "@import \"../partials/gone.html\";")?;

    let mut emitted = Vec::new();
    let result = inliner
        .update_dependents_with(project.source_file("partials/header.html")?, |file| {
            emitted.push(file)
        })
        .await;

    assert!(result.is_err_and(|e| e.is_dependency_not_found()));
    assert_eq!(paths(&emitted), vec![PathBuf::from("partials/header.html")]);
    Ok(())
}

#[tokio::test]
async fn test_spelling_of_changed_path_does_not_matter() -> Result<()> {
    let project = project()?;
    let inliner = primed(&project, DependencyOutput::Dependant).await?;

    let file = project.source_file("pages/../partials/./header.html")?;
    assert_eq!(inliner.update_dependents(file).await?.len(), 2);
    Ok(())
}
