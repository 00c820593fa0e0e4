use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, is_repo_identifier};

// Embed the slash command at compile time
const CLAUDE_COMMAND: &str = include_str!("../commands/share.md");
const COMMAND_FILE: &str = "share.md";

#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(PathBuf),
    AlreadyPresent(PathBuf),
}

pub fn run() -> Result<()> {
    let theme = ColorfulTheme::default();

    if find_in_path("gh").is_none() {
        println!("Warning: gh CLI not found in PATH; install it and run `gh auth login`.");
    }
    if find_in_path("git").is_none() {
        bail!("git not found in PATH");
    }

    let mut config = Config::load()?;
    let mut prompt = Input::<String>::with_theme(&theme)
        .with_prompt("GitHub repository for shared sessions (owner/name)")
        .validate_with(|input: &String| -> Result<(), &str> {
            if is_repo_identifier(input.trim()) {
                Ok(())
            } else {
                Err("expected owner/name")
            }
        });
    if let Some(repo) = config.repo.clone() {
        prompt = prompt.default(repo);
    }
    let repo: String = prompt.interact_text()?;
    config.set("repo", &repo)?;
    let path = config.save()?;
    println!("Saved config to {}.", path.display());

    let install = Confirm::with_theme(&theme)
        .with_prompt("Install the /share command for Claude Code?")
        .default(true)
        .interact()?;
    if install {
        match install_claude_command(&claude_commands_dir()?)? {
            InstallOutcome::Installed(dest) => {
                println!("Installed Claude command to {}.", dest.display())
            }
            InstallOutcome::AlreadyPresent(dest) => println!(
                "Skipping Claude command (already installed at {}).",
                dest.display()
            ),
        }
    }

    println!();
    println!("Done! Restart Claude Code to pick up changes.");
    Ok(())
}

/// Write the `/share` command into `dest_dir` unless one already exists
pub fn install_claude_command(dest_dir: &Path) -> Result<InstallOutcome> {
    let dest = dest_dir.join(COMMAND_FILE);
    if dest.exists() {
        return Ok(InstallOutcome::AlreadyPresent(dest));
    }
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;
    fs::write(&dest, CLAUDE_COMMAND)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(InstallOutcome::Installed(dest))
}

fn claude_commands_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".claude").join("commands"))
}

fn find_in_path(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(binary);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::is_user_noise;
    use tempfile::TempDir;

    #[test]
    fn installs_once_then_skips() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("commands");

        let first = install_claude_command(&dir).unwrap();
        assert_eq!(first, InstallOutcome::Installed(dir.join(COMMAND_FILE)));
        let body = fs::read_to_string(dir.join(COMMAND_FILE)).unwrap();
        assert!(body.contains("sessionshare share $ARGUMENTS"));

        let second = install_claude_command(&dir).unwrap();
        assert_eq!(second, InstallOutcome::AlreadyPresent(dir.join(COMMAND_FILE)));
    }

    #[test]
    fn expanded_command_is_filtered_from_transcripts() {
        assert!(is_user_noise(CLAUDE_COMMAND));
    }

    #[cfg(unix)]
    #[test]
    fn find_in_path_requires_executable() {
        use crate::test_utils::{EnvGuard, env_lock};
        use std::os::unix::fs::PermissionsExt;

        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("tool-x");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        let plain = tmp.path().join("tool-y");
        fs::write(&plain, "").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        let _path = EnvGuard::set("PATH", tmp.path().to_str().unwrap());
        assert_eq!(find_in_path("tool-x"), Some(exe));
        assert_eq!(find_in_path("tool-y"), None);
    }
}
