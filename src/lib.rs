//! Render a Claude Code session transcript to markdown and publish it to a
//! GitHub repository with `gh` and `git`.

use anyhow::Result;
use std::path::PathBuf;

pub mod config;
pub mod filter;
pub mod logging;
pub mod publish;
pub mod render;
pub mod runner;
pub mod setup;
pub mod transcript;

#[cfg(test)]
mod test_utils;

pub use config::{Config, ShareConfig};
pub use publish::{PublishResult, PublishTarget, Publisher, slugify, validate_config};
pub use render::{render, render_at, render_file};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use transcript::resolve_transcript;

/// Options for the share command
#[derive(Debug, Default)]
pub struct ShareOptions {
    pub description: Option<String>,
    pub transcript: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum ShareOutcome {
    Published(PublishResult),
    DryRun {
        transcript: PathBuf,
        target: PublishTarget,
        document_bytes: usize,
    },
}

/// Locate the transcript, check config, render, and publish (or stop short
/// on a dry run).
pub fn share(
    options: ShareOptions,
    config: &ShareConfig,
    publisher: &Publisher<'_>,
) -> Result<ShareOutcome> {
    let transcript = resolve_transcript(options.transcript)?;
    let name = transcript
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| transcript.display().to_string());
    println!("📄 Found session: {name}");
    println!();

    validate_config(config)?;

    println!("Converting session to markdown...");
    let document = render_file(&transcript)?;
    let description = options.description.as_deref();

    if options.dry_run {
        let target = publisher.plan(description, config, render::now_local())?;
        return Ok(ShareOutcome::DryRun {
            transcript,
            target,
            document_bytes: document.len(),
        });
    }

    let result = publisher.publish(&document, description, config)?;
    Ok(ShareOutcome::Published(result))
}
