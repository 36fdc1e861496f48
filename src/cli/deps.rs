//! Show which files import which.
//!
//! ```text
//! $ inliner deps 'src/*.txt'
//! src/lib.txt
//!   <- src/a.txt
//!   <- src/b.txt
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use std::path::{Path, PathBuf};

use super::common::{CommandContext, InlineArgs};
use crate::resolver::canonicalize;

/// Print the dependency cache built from resolving files.
#[derive(Args, Debug)]
pub struct DepsCommand {
    /// Files to scan (glob patterns)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<String>,

    /// Resolution options
    #[command(flatten)]
    pub options: InlineArgs,
}

impl DepsCommand {
    /// Resolve the files, discarding output, and print dependency -> dependents.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let inliner = ctx.inliner(&self.options).await?;
        let files = ctx.expand(&self.files)?;

        let results = join_all(files.iter().map(|path| {
            let inliner = &inliner;
            async move {
                let file = ctx.open(path, false).await?;
                inliner.run_buffered(file).await?;
                anyhow::Ok(())
            }
        }))
        .await;
        for (path, result) in files.iter().zip(results) {
            if let Err(e) = result {
                eprintln!("{} {}: {:#}", "warning:".yellow().bold(), path.display(), e);
            }
        }

        let snapshot = inliner.cache().snapshot();
        if snapshot.is_empty() {
            println!("{}", "No imports found".dimmed());
            return Ok(());
        }

        let roots = [canonicalize(&ctx.cwd).await, ctx.cwd.clone()];
        for (dependency, dependents) in snapshot {
            println!("{}", display(&roots, &dependency).bold());
            for dependent in dependents {
                println!("  {} {}", "<-".dimmed(), display(&roots, &dependent.path));
            }
        }
        Ok(())
    }
}

/// `path` relative to the first root containing it.
fn display(roots: &[PathBuf], path: &Path) -> String {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .unwrap_or(path)
        .display()
        .to_string()
}
