use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::runner::CommandRunner;

pub const REPO_ENV: &str = "CLAUDE_SHARE_REPO";
pub const USER_ENV: &str = "CLAUDE_SHARE_USER";
pub const BRANCH_ENV: &str = "CLAUDE_SHARE_BRANCH";
pub const BASE_PATH_ENV: &str = "CLAUDE_SHARE_BASE_PATH";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_BASE_PATH: &str = "sessions";

/// Values stored in ~/.sessionshare/config.toml. Unset keys fall through to
/// the environment and then to computed defaults.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Target repository as owner/name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Directory under base_path; defaults to the authenticated gh user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

/// Fully resolved settings for one publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    pub repo: String,
    pub username: String,
    pub branch: String,
    pub base_path: String,
}

pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".sessionshare").join("config.toml"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ask gh for the authenticated user's login. Empty when gh is missing,
/// unauthenticated, or fails.
pub fn detect_github_username(runner: &dyn CommandRunner) -> String {
    match runner.run("gh", &["api", "user", "--jq", ".login"]) {
        Ok(output) if output.success() => output.stdout.trim().to_string(),
        Ok(output) => {
            tracing::warn!(stderr = %output.stderr.trim(), "gh api user failed");
            String::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not run gh");
            String::new()
        }
    }
}

impl Config {
    /// Load config from ~/.sessionshare/config.toml, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save config to ~/.sessionshare/config.toml
    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Set a key by name, accepting the short aliases the CLI offers
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = non_empty(Some(value.to_string()));
        match key {
            "repo" | "repository" => {
                if let Some(repo) = value.as_deref() {
                    if !is_repo_identifier(repo) {
                        bail!("invalid repo: expected owner/name");
                    }
                }
                self.repo = value;
            }
            "username" | "user" => self.username = value,
            "branch" => self.branch = value,
            "base_path" | "base" => self.base_path = value,
            _ => bail!("unknown config key: {key}"),
        }
        Ok(())
    }

    /// Load `path`, set one key, and write it back. A file that fails to
    /// parse is reported and left untouched.
    pub fn update_file(path: &Path, key: &str, value: &str) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.set(key, value)?;
        config.save_to(path)?;
        Ok(config)
    }

    /// Merge file values, the environment (via `env`), and defaults.
    /// gh is only consulted when no username is configured.
    pub fn resolve(
        &self,
        env: impl Fn(&str) -> Option<String>,
        runner: &dyn CommandRunner,
    ) -> ShareConfig {
        let pick = |file: &Option<String>, key: &str| non_empty(file.clone()).or_else(|| non_empty(env(key)));

        let repo = pick(&self.repo, REPO_ENV).unwrap_or_default();
        let username = pick(&self.username, USER_ENV)
            .unwrap_or_else(|| detect_github_username(runner));
        let branch = pick(&self.branch, BRANCH_ENV).unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let base_path = pick(&self.base_path, BASE_PATH_ENV)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

        ShareConfig {
            repo,
            username,
            branch,
            base_path,
        }
    }

    /// Resolve against the process environment
    pub fn resolve_from_env(&self, runner: &dyn CommandRunner) -> ShareConfig {
        self.resolve(|key| std::env::var(key).ok(), runner)
    }
}

/// owner/name with both halves non-empty
pub fn is_repo_identifier(value: &str) -> bool {
    match value.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}
