//! Subprocess execution for git commands

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::command::GitCommand;
use crate::{Error, Result};

/// Minimum git version supporting `clone --sparse` and `sparse-checkout set`
pub const MIN_GIT_VERSION: (u32, u32) = (2, 25);

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Decoded stdout
    pub stdout: String,
    /// Decoded stderr
    pub stderr: String,
}

/// Trait for executing git commands
///
/// Implementations must not leave a child running once the returned future
/// is dropped.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion
    ///
    /// Returns the captured output on exit code 0, `Error::Execution` otherwise.
    async fn run(&self, command: &GitCommand) -> Result<CommandOutput>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }

    fn build_command(command: &GitCommand) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.get_args())
            // Fail instead of blocking on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = command.get_current_dir() {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &GitCommand) -> Result<CommandOutput> {
        debug!(command = %command, "Running command");

        let output = Self::build_command(command)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::MissingDependency(format!(
                        "'{}' not found. Is git installed and on your PATH?",
                        command.program()
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::Execution {
                command: command.to_string(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Parse `git version 2.39.2` (and vendor suffixes) into `(major, minor)`
pub fn parse_git_version(output: &str) -> Option<(u32, u32)> {
    let version = output.split_whitespace().nth(2)?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()?
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()?;
    Some((major, minor))
}

/// Verify that the git executable exists and is recent enough
pub async fn ensure_git_installed(runner: &dyn CommandRunner, git_path: &str) -> Result<()> {
    let output = runner
        .run(&GitCommand::new(git_path).arg("--version"))
        .await
        .map_err(|e| match e {
            Error::MissingDependency(_) => e,
            other => Error::MissingDependency(format!(
                "Git is not installed or not accessible at '{}': {}",
                git_path, other
            )),
        })?;

    let version = parse_git_version(&output.stdout).ok_or_else(|| {
        Error::MissingDependency(format!(
            "Unexpected git version output: {}",
            output.stdout.trim()
        ))
    })?;

    if version < MIN_GIT_VERSION {
        return Err(Error::MissingDependency(format!(
            "Git {}.{}+ is required for sparse checkout, found {}.{}. Please upgrade git.",
            MIN_GIT_VERSION.0, MIN_GIT_VERSION.1, version.0, version.1
        )));
    }

    debug!(major = version.0, minor = version.1, "Git version OK");
    Ok(())
}
