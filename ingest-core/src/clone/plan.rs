//! Clone planning: turn a [`CloneConfig`] into concrete git invocations
//!
//! The decision table lives here so it can be tested without subprocesses:
//!
//! | config                | clone flags                                   |
//! |-----------------------|-----------------------------------------------|
//! | always                | `--single-branch`                             |
//! | `include_submodules`  | `--recurse-submodules`                        |
//! | `subpath != "/"`      | `--filter=blob:none --sparse`                 |
//! | no `commit`           | `--depth=1` and `--branch <tag or branch>`    |
//! | `commit`              | full history, follow-up `checkout <commit>`   |
//!
//! User-supplied positionals (URL, destination, commit) always follow
//! `--end-of-options`, so a value starting with `-` is never parsed as a flag.

use super::config::CloneConfig;
use super::sparse::sparse_checkout_command;
use crate::git::{auth_args, GitCommand};
use crate::{Error, Result};

/// The ordered git invocations for one clone operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonePlan {
    clone: GitCommand,
    sparse_checkout: Option<GitCommand>,
    checkout: Option<GitCommand>,
}

impl ClonePlan {
    /// Plan the commands for `config`
    ///
    /// Every command carries the same auth prefix when a token is supplied
    /// for a recognized host.
    pub fn new(config: &CloneConfig, token: Option<&str>, git_path: &str) -> Result<Self> {
        let local_path = config.local_path.to_str().ok_or_else(|| {
            Error::Config(format!(
                "Destination path is not valid UTF-8: {}",
                config.local_path.display()
            ))
        })?;
        let auth = auth_args(token, &config.url)?;

        let mut clone = GitCommand::new(git_path)
            .args(auth.iter().cloned())
            .args(["clone", "--single-branch"]);

        if config.include_submodules {
            clone = clone.arg("--recurse-submodules");
        }

        if config.partial_clone() {
            clone = clone.args(["--filter=blob:none", "--sparse"]);
        }

        if config.shallow() {
            clone = clone.arg("--depth=1");
        }

        if let Some(reference) = config.clone_ref() {
            clone = clone.arg("--branch").arg(reference);
        }

        let clone = clone
            .arg("--end-of-options")
            .arg(&config.url)
            .arg(local_path);

        // Follow-up steps run inside the new working tree
        let in_repo = GitCommand::new(git_path)
            .arg("-C")
            .arg(local_path)
            .args(auth);

        let sparse_checkout = config
            .partial_clone()
            .then(|| sparse_checkout_command(&in_repo, config));

        let checkout = config
            .commit
            .as_ref()
            .map(|commit| {
                in_repo
                    .clone()
                    .args(["checkout", "--end-of-options"])
                    .arg(commit)
            });

        Ok(Self {
            clone,
            sparse_checkout,
            checkout,
        })
    }

    /// The `git clone` invocation
    pub fn clone_command(&self) -> &GitCommand {
        &self.clone
    }

    /// The `sparse-checkout set` invocation, present iff partial
    pub fn sparse_checkout_command(&self) -> Option<&GitCommand> {
        self.sparse_checkout.as_ref()
    }

    /// The `checkout <commit>` invocation, present iff a commit was requested
    pub fn checkout_command(&self) -> Option<&GitCommand> {
        self.checkout.as_ref()
    }

    /// All commands in execution order
    pub fn commands(&self) -> impl Iterator<Item = &GitCommand> {
        std::iter::once(&self.clone)
            .chain(self.sparse_checkout.as_ref())
            .chain(self.checkout.as_ref())
    }
}
