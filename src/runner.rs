//! External command execution behind a small capability trait.

use anyhow::{Context, Result};
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs `gh` / `git` on behalf of the publish workflow.
///
/// `Err` means the command could not be started at all (missing binary,
/// permissions). A command that ran and failed is `Ok` with a non-zero
/// `exit_code`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs commands as real subprocesses and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        tracing::debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {program}; is it installed and on PATH?"))?;
        let result = CommandOutput {
            // Killed by a signal: no code, treat as failure.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        tracing::debug!(program, exit_code = result.exit_code, "command finished");
        Ok(result)
    }
}
