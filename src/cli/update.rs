//! Re-resolve the files that import a changed file.
//!
//! The dependency cache only lives as long as the process, so the command
//! first resolves the `--files` set to learn who imports what, then runs the
//! update workflow for the changed file.
//!
//! ```bash
//! inliner update src/lib.txt --files 'src/*.txt' --dependency-output all --out-dir dist
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use std::path::PathBuf;

use super::common::{CommandContext, InlineArgs, Output};

/// Re-resolve dependents of a changed file.
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// The file that changed
    #[arg(value_name = "CHANGED")]
    pub changed: PathBuf,

    /// Files whose imports are tracked (glob patterns)
    #[arg(long, required = true, num_args = 1.., value_name = "FILES")]
    pub files: Vec<String>,

    /// Write results under this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Process files as chunk streams; every dependent is emitted regardless of policy
    #[arg(long)]
    pub stream: bool,

    /// Resolution options
    #[command(flatten)]
    pub options: InlineArgs,
}

impl UpdateCommand {
    /// Populate the cache from `--files`, then update dependents of the changed file.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let inliner = ctx.inliner(&self.options).await?;
        let files = ctx.expand(&self.files)?;

        let passes = join_all(files.iter().map(|path| {
            let inliner = &inliner;
            async move {
                let file = ctx.open(path, false).await?;
                inliner.run_buffered(file).await?;
                anyhow::Ok(())
            }
        }))
        .await;
        for (path, pass) in files.iter().zip(passes) {
            if let Err(e) = pass {
                tracing::warn!("Could not track imports of {}: {:#}", path.display(), e);
            }
        }
        tracing::debug!("Tracking {} dependencies", inliner.cache().len());

        let primary = ctx.open(&ctx.cwd.join(&self.changed), self.stream).await?;
        let mut emitted = Vec::new();
        let result = inliner.update_dependents_with(primary, |file| emitted.push(file)).await;

        let output = Output::new(self.out_dir.map(|dir| ctx.cwd.join(dir)), emitted.len());
        let mut failed = 0;
        for file in emitted {
            if let Err(e) = output.write(file).await {
                failed += 1;
                eprintln!("{} {:#}", "error:".red().bold(), e);
            }
        }

        result?;
        if failed > 0 {
            anyhow::bail!("{failed} updated file(s) could not be written");
        }
        Ok(())
    }
}
