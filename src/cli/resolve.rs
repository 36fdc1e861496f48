//! Resolve import directives in a set of files.
//!
//! ```bash
//! inliner resolve 'src/**/*.txt' --out-dir dist
//! inliner resolve page.html --recursive
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use std::path::PathBuf;

use super::common::{CommandContext, InlineArgs, Output};
use crate::engine::Inliner;

/// Resolve files and write the results.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Files to resolve (glob patterns)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<String>,

    /// Write results under this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Process files as chunk streams instead of whole buffers
    #[arg(long)]
    pub stream: bool,

    /// Resolution options
    #[command(flatten)]
    pub options: InlineArgs,
}

impl ResolveCommand {
    /// Resolve every matched file concurrently.
    ///
    /// A failing file is reported and does not stop the others; the command
    /// fails at the end if any file failed.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let inliner = ctx.inliner(&self.options).await?;
        let files = ctx.expand(&self.files)?;
        let output = Output::new(self.out_dir.map(|dir| ctx.cwd.join(dir)), files.len());

        let failed = resolve_all(ctx, &inliner, &files, self.stream, &output).await;
        if failed > 0 {
            anyhow::bail!("{} of {} file(s) failed to resolve", failed, files.len());
        }
        Ok(())
    }
}

/// Resolve and write `files`; returns the number that failed.
async fn resolve_all(
    ctx: &CommandContext,
    inliner: &Inliner,
    files: &[PathBuf],
    stream: bool,
    output: &Output,
) -> usize {
    let results = join_all(files.iter().map(|path| async move {
        let file = ctx.open(path, stream).await?;
        inliner.run(file).await.map_err(anyhow::Error::from)
    }))
    .await;

    // Written in input order so stdout output is deterministic
    let mut failed = 0;
    for (path, result) in files.iter().zip(results) {
        let written = match result {
            Ok(file) => output.write(file).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            failed += 1;
            eprintln!("{} {}: {:#}", "error:".red().bold(), path.display(), e);
        }
    }
    failed
}
