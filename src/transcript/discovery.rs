//! Transcript discovery: finding the current Claude Code session log.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Environment variable naming an explicit transcript path
pub const TRANSCRIPT_ENV: &str = "CLAUDE_SHARE_TRANSCRIPT";

/// Get the Claude projects directory (~/.claude/projects)
pub fn claude_projects_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".claude").join("projects"))
}

/// Encode a cwd path to Claude's project folder name format.
/// Rules: /. -> /- (hidden dirs), / -> -, _ -> -
pub fn cwd_to_project_folder(cwd: &str) -> String {
    cwd.replace("/.", "/-").replace(['/', '_'], "-")
}

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("jsonl")
}

fn keep_newest(best: &mut Option<(PathBuf, SystemTime)>, path: &Path, modified: SystemTime) {
    let dominated = match best.as_ref() {
        Some((_, best_time)) => modified <= *best_time,
        None => false,
    };
    if !dominated {
        *best = Some((path.to_path_buf(), modified));
    }
}

/// Newest non-empty `*.jsonl` directly inside `dir`
fn newest_in_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let mut best: Option<(PathBuf, SystemTime)> = None;
    for entry in fs::read_dir(dir)?.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !is_jsonl(&path) {
            continue;
        }
        // Follows symlinks; dangling links fail here and are skipped.
        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        if !meta.is_file() || meta.len() == 0 {
            continue;
        }
        keep_newest(&mut best, &path, meta.modified().unwrap_or(UNIX_EPOCH));
    }
    Ok(best.map(|(path, _)| path))
}

/// Newest non-empty `*.jsonl` anywhere under `root`
fn newest_in_tree(root: &Path) -> Result<Option<PathBuf>> {
    let mut best: Option<(PathBuf, SystemTime)> = None;
    let entries = WalkDir::new(root).follow_links(true).into_iter().filter_map(|entry| {
        entry
            .map_err(|err| tracing::debug!(error = %err, "skipping unreadable entry"))
            .ok()
    });
    for entry in entries {
        if !entry.file_type().is_file() || !is_jsonl(entry.path()) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.len() == 0 {
            continue;
        }
        keep_newest(&mut best, entry.path(), meta.modified().unwrap_or(UNIX_EPOCH));
    }
    Ok(best.map(|(path, _)| path))
}

/// Find the most recent session log, preferring the project folder for `cwd`
/// and falling back to every project.
pub fn find_latest_session_log(cwd: &str) -> Result<Option<PathBuf>> {
    let projects_dir = claude_projects_dir()?;
    let project_dir = projects_dir.join(cwd_to_project_folder(cwd));

    if project_dir.is_dir() {
        if let Some(path) = newest_in_dir(&project_dir)? {
            tracing::debug!(path = %path.display(), "found transcript in project folder");
            return Ok(Some(path));
        }
    }

    if !projects_dir.is_dir() {
        return Ok(None);
    }
    let found = newest_in_tree(&projects_dir)?;
    if let Some(path) = found.as_ref() {
        tracing::debug!(path = %path.display(), "found transcript by scanning all projects");
    }
    Ok(found)
}

/// Resolve the transcript to share: explicit path, then the
/// `CLAUDE_SHARE_TRANSCRIPT` variable, then discovery by cwd.
pub fn resolve_transcript(transcript_arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = transcript_arg {
        return Ok(path);
    }

    if let Ok(path) = std::env::var(TRANSCRIPT_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let cwd = std::env::current_dir()
        .ok()
        .and_then(|path| path.to_str().map(|s| s.to_string()))
        .context("unable to resolve cwd; pass --transcript")?;

    if let Some(path) = find_latest_session_log(&cwd)? {
        return Ok(path);
    }

    bail!(
        "could not find Claude Code session log\nExpected location: ~/.claude/projects/**/*.jsonl"
    )
}
