//! Recording command runner for unit tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::command::GitCommand;
use super::runner::{CommandOutput, CommandRunner};
use crate::{Error, Result};

#[derive(Debug, Clone)]
enum Reply {
    Ok(String),
    Fail(i32, String),
    Hang,
}

/// Runner that records every command and replies from canned rules
///
/// Rules match when the command contains the given argument; the first match
/// wins. Unmatched commands succeed with empty output, except `--version`
/// which reports a modern git.
#[derive(Debug, Default)]
pub struct MockRunner {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<GitCommand>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, arg: &str, stdout: &str) -> Self {
        self.rules
            .push((arg.to_string(), Reply::Ok(stdout.to_string())));
        self
    }

    pub fn fail(mut self, arg: &str, code: i32, stderr: &str) -> Self {
        self.rules
            .push((arg.to_string(), Reply::Fail(code, stderr.to_string())));
        self
    }

    pub fn hang(mut self, arg: &str) -> Self {
        self.rules.push((arg.to_string(), Reply::Hang));
        self
    }

    pub fn calls(&self) -> Vec<GitCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands containing `arg`
    pub fn calls_with(&self, arg: &str) -> Vec<GitCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.has_arg(arg))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &GitCommand) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());

        let reply = self
            .rules
            .iter()
            .find(|(arg, _)| command.has_arg(arg))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Ok(stdout)) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
            }),
            Some(Reply::Fail(code, stderr)) => Err(Error::Execution {
                command: command.to_string(),
                code: Some(code),
                stderr,
            }),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(CommandOutput::default())
            }
            None if command.has_arg("--version") => Ok(CommandOutput {
                stdout: "git version 2.43.0\n".to_string(),
                stderr: String::new(),
            }),
            None => Ok(CommandOutput::default()),
        }
    }
}
