//! Git process plumbing
//!
//! This module builds git invocations, runs them as subprocesses, resolves
//! per-host auth headers and queries remotes.

mod auth;
mod command;
mod remote;
mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{auth_args, create_git_auth_header, is_github_host, validate_github_token};
pub use command::GitCommand;
pub use remote::{check_repo_exists, is_not_found_stderr, list_remote_branches};
pub use runner::{
    ensure_git_installed, parse_git_version, CommandOutput, CommandRunner, ProcessRunner,
    MIN_GIT_VERSION,
};
