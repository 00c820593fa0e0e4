//! Shared test utilities.
//!
//! All tests that manipulate environment variables or the current directory
//! must use the shared `env_lock()` to prevent race conditions.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::runner::{CommandOutput, CommandRunner};

/// Global lock for tests that modify environment variables or current directory.
/// All such tests MUST hold this lock to prevent race conditions.
pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for temporarily setting an environment variable.
pub struct EnvGuard {
    key: String,
    old: Option<String>,
}

impl EnvGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let old = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            old,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        if let Some(val) = &self.old {
            unsafe {
                std::env::set_var(&self.key, val);
            }
        } else {
            unsafe {
                std::env::remove_var(&self.key);
            }
        }
    }
}

/// RAII guard for temporarily changing the current directory.
pub struct DirGuard {
    original: PathBuf,
}

impl DirGuard {
    pub fn set(path: &Path) -> anyhow::Result<Self> {
        let original = std::env::current_dir()?;
        std::env::set_current_dir(path)?;
        Ok(Self { original })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Scripted `CommandRunner`. Records every command line as
/// `"program arg1 arg2"` and answers with the first response whose prefix
/// matches; unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    responses: Vec<(String, CommandOutput)>,
    unavailable: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.push((prefix.to_string(), output));
        self
    }

    pub fn fail(self, prefix: &str, stderr: &str) -> Self {
        self.respond(
            prefix,
            CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    /// Commands starting with `prefix` fail to spawn at all.
    pub fn unavailable(mut self, prefix: &str) -> Self {
        self.unavailable.push(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        if self.unavailable.iter().any(|p| line.starts_with(p.as_str())) {
            bail!("failed to run {program}; is it installed and on PATH?");
        }
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}
