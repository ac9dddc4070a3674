//! External process execution
//!
//! Every collaborator of this tool (`cm`, `buildkite-agent`) is a separate
//! program. This module runs them and shapes their output for diagnostics.

use crate::error::{SyncError, SyncResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Max number of output lines to include in error messages.
const ERROR_TAIL_LINES: usize = 50;

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Human-readable command line, used in error context
    pub command: String,
    /// Whether the process exited with status zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stdout, the value most queries care about
    pub fn value(&self) -> String {
        self.stdout.trim().to_string()
    }

    /// Combined stdout+stderr tail for error messages
    pub fn diagnostic(&self) -> String {
        diagnostic_output(&self.stdout, &self.stderr)
    }

    /// Turn a non-zero exit into a `SyncError::Tool`
    pub fn into_result(self) -> SyncResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(SyncError::tool(self.command.clone(), self.diagnostic()))
        }
    }
}

/// Extract the useful tail of command output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `ERROR_TAIL_LINES`
/// lines so annotations stay readable.
pub fn diagnostic_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail = if total > ERROR_TAIL_LINES {
        &lines[total - ERROR_TAIL_LINES..]
    } else {
        &lines[..]
    };
    tail.join("\n")
}

/// Render a command line for logs and error messages
pub fn describe(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("{:?}", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

/// Run a program to completion and capture its output.
///
/// Spawn failures become `SyncError::CommandFailed`; a non-zero exit is
/// reported through `CommandOutput::success` so callers decide what it means.
pub async fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> SyncResult<CommandOutput> {
    let command = describe(program, args);
    debug!("Executing: {}", command);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .await
        .map_err(|e| SyncError::command_failed(command.clone(), e))?;

    Ok(CommandOutput {
        command,
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
