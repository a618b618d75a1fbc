//! Running assembled commands
//!
//! [`CommandRunner`] is the seam to the host: tests substitute a recording
//! fake, production uses [`SystemRunner`]. Nothing here retries; a failing
//! exit code is handed back to the caller as data.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::command::PipCommand;
use crate::error::{Error, Result};

/// Exit code and captured output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// One command run: what, where, and as whom.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub command: &'a PipCommand,
    pub cwd: Option<&'a Path>,
    pub runas: Option<&'a str>,
}

/// Executes an [`Invocation`] and captures its output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation<'_>) -> Result<CommandResult>;
}

/// [`CommandRunner`] that spawns real processes.
///
/// Plain commands are spawned directly from their tokens. A shell is only
/// involved for activation (`sh -c`) or another user (`su -s /bin/sh`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn build(invocation: &Invocation<'_>) -> Result<Command> {
        let command = invocation.command;

        let mut cmd = match invocation.runas {
            Some(user) => run_as(user, &command.shell_line())?,
            None if command.activation().is_some() => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command.shell_line());
                cmd
            }
            None => {
                let mut cmd = Command::new(command.program());
                cmd.args(command.args());
                cmd
            }
        };

        if let Some(cwd) = invocation.cwd {
            cmd.current_dir(cwd);
        }
        Ok(cmd)
    }
}

#[cfg(not(windows))]
fn run_as(user: &str, line: &str) -> Result<Command> {
    let mut cmd = Command::new("su");
    cmd.args(["-s", "/bin/sh", user, "-c", line]);
    Ok(cmd)
}

#[cfg(windows)]
fn run_as(user: &str, _line: &str) -> Result<Command> {
    Err(Error::RunAsUnsupported {
        user: user.to_string(),
    })
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation<'_>) -> Result<CommandResult> {
        debug!(
            command = %invocation.command,
            cwd = ?invocation.cwd,
            runas = ?invocation.runas,
            "running pip"
        );

        let output = Self::build(invocation)?
            .output()
            .map_err(|source| Error::Spawn {
                program: invocation.command.program().display().to_string(),
                source,
            })?;

        let result = CommandResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(code = result.code, "pip finished");
        Ok(result)
    }
}
