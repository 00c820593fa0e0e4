//! Publish orchestration: clone the target repo, commit the rendered
//! session, and push it.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::{OffsetDateTime, format_description};

use crate::config::{REPO_ENV, USER_ENV, ShareConfig};
use crate::render::now_local;
use crate::runner::{CommandOutput, CommandRunner};

/// Fixed scratch clone location under the system temp dir
pub const SCRATCH_DIR_NAME: &str = "claude-share-temp";

const MAX_SLUG_CHARS: usize = 50;

pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join(SCRATCH_DIR_NAME)
}

/// Lower-case, collapse every run of non `[a-z0-9]` characters to one `-`,
/// trim dashes, cap at 50 chars. Empty input becomes `session`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    // Slug is ASCII here, so byte truncation is char-safe.
    slug.truncate(MAX_SLUG_CHARS);
    if slug.is_empty() {
        "session".to_string()
    } else {
        slug
    }
}

/// `YYYYMMDD-HHMMSS`
pub fn file_timestamp(now: OffsetDateTime) -> String {
    let fmt = format_description::parse("[year][month][day]-[hour][minute][second]").ok();
    if let Some(fmt) = fmt {
        if let Ok(text) = now.format(&fmt) {
            return text;
        }
    }
    now.unix_timestamp().to_string()
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string())
}

/// Where a session lands: derived per invocation, never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub repo: String,
    pub branch: String,
    pub base_path: String,
    pub username: String,
    pub timestamp: String,
    pub description: Option<String>,
    pub filename: String,
}

impl PublishTarget {
    pub fn new(config: &ShareConfig, description: Option<&str>, now: OffsetDateTime) -> Self {
        let timestamp = file_timestamp(now);
        let description = clean_description(description);
        let filename = match description.as_deref() {
            Some(desc) => format!("{timestamp}-{}.md", slugify(desc)),
            None => format!("{timestamp}.md"),
        };
        Self {
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            base_path: config.base_path.clone(),
            username: config.username.clone(),
            timestamp,
            description,
            filename,
        }
    }

    /// Path of the file inside the repository
    pub fn file_path(&self) -> String {
        format!("{}/{}/{}", self.base_path, self.username, self.filename)
    }

    pub fn url(&self) -> String {
        format!(
            "https://github.com/{}/blob/{}/{}",
            self.repo,
            self.branch,
            self.file_path()
        )
    }

    pub fn commit_message(&self) -> String {
        match self.description.as_deref() {
            Some(desc) => format!("Add session: {desc}"),
            None => format!("Add session {}", self.timestamp),
        }
    }
}

/// Check the settings a publish cannot run without
pub fn validate_config(config: &ShareConfig) -> Result<()> {
    if config.repo.trim().is_empty() {
        bail!(
            "repository not configured\n\n\
             Run setup to configure:\n  sessionshare setup\n\n\
             Or set manually:\n  export {REPO_ENV}=owner/repo"
        );
    }
    if config.username.trim().is_empty() {
        bail!(
            "could not detect GitHub username\n\
             Make sure gh CLI is installed and authenticated: gh auth login\n\
             Or set it explicitly: export {USER_ENV}=your-login"
        );
    }
    Ok(())
}

/// Result of a successful publish
#[derive(Debug, Serialize)]
pub struct PublishResult {
    pub repo: String,
    pub branch: String,
    pub file_path: String,
    pub url: String,
    pub commit_message: String,
}

/// Runs the clone / write / commit / push sequence through a `CommandRunner`
pub struct Publisher<'a> {
    runner: &'a dyn CommandRunner,
    scratch_dir: PathBuf,
}

impl<'a> Publisher<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            scratch_dir: default_scratch_dir(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Validate config and compute the target without touching anything
    pub fn plan(
        &self,
        description: Option<&str>,
        config: &ShareConfig,
        now: OffsetDateTime,
    ) -> Result<PublishTarget> {
        validate_config(config)?;
        Ok(PublishTarget::new(config, description, now))
    }

    fn run_checked(&self, failure: &str, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.runner.run(program, args)?;
        if !output.success() {
            bail!("{failure}: {}", output.stderr.trim());
        }
        Ok(output)
    }

    /// Publish `document`, stamping the filename with the current local time
    pub fn publish(
        &self,
        document: &str,
        description: Option<&str>,
        config: &ShareConfig,
    ) -> Result<PublishResult> {
        self.publish_at(document, description, config, now_local())
    }

    pub fn publish_at(
        &self,
        document: &str,
        description: Option<&str>,
        config: &ShareConfig,
        now: OffsetDateTime,
    ) -> Result<PublishResult> {
        let target = self.plan(description, config, now)?;
        let file_path = target.file_path();
        let scratch = self
            .scratch_dir
            .to_str()
            .context("scratch directory path is not valid UTF-8")?;

        if self.scratch_dir.exists() {
            fs::remove_dir_all(&self.scratch_dir)
                .with_context(|| format!("failed to remove {}", self.scratch_dir.display()))?;
        }

        println!("Cloning {}...", target.repo);
        self.run_checked(
            "error cloning repository",
            "gh",
            &["repo", "clone", &target.repo, scratch],
        )?;

        let target_dir = self
            .scratch_dir
            .join(&target.base_path)
            .join(&target.username);
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("failed to create {}", target_dir.display()))?;
        let target_file = target_dir.join(&target.filename);
        fs::write(&target_file, document)
            .with_context(|| format!("failed to write {}", target_file.display()))?;
        tracing::info!(path = %target_file.display(), bytes = document.len(), "wrote session");

        let commit_message = target.commit_message();
        self.run_checked("git add failed", "git", &["-C", scratch, "add", &file_path])?;
        self.run_checked(
            "git commit failed",
            "git",
            &["-C", scratch, "commit", "-m", &commit_message],
        )?;

        println!("Pushing to {}...", target.repo);
        self.run_checked(
            "error pushing to GitHub",
            "git",
            &["-C", scratch, "push", "origin", &target.branch],
        )?;

        let url = target.url();
        println!();
        println!("✅ Session shared successfully!");
        println!("📄 View at: {url}");

        if let Err(err) = fs::remove_dir_all(&self.scratch_dir) {
            tracing::debug!(error = %err, "could not remove scratch directory");
        }

        Ok(PublishResult {
            repo: target.repo,
            branch: target.branch,
            file_path,
            url,
            commit_message,
        })
    }
}
