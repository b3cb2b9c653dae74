//! Clone orchestration
//!
//! [`Cloner`] sequences the git version check, the existence check, the clone
//! and the optional sparse-checkout and commit checkout under one deadline.
//! When the deadline expires the in-flight future is dropped, which kills the
//! running child process, and [`Error::Timeout`] is returned.

mod config;
mod plan;
mod sparse;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::git::{
    check_repo_exists, ensure_git_installed, list_remote_branches, CommandRunner, ProcessRunner,
};
use crate::{Config, Error, Result};

pub use config::{CloneConfig, ROOT_SUBPATH};
pub use plan::ClonePlan;
pub use sparse::sparse_pattern;

/// Default deadline for a whole clone operation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default git executable
pub const DEFAULT_GIT_PATH: &str = "git";

/// Clones repositories according to a [`CloneConfig`]
///
/// Holds no per-operation state, so one `Cloner` can serve concurrent clones
/// into distinct destinations.
#[derive(Clone)]
pub struct Cloner {
    runner: Arc<dyn CommandRunner>,
    git_path: String,
    timeout: Duration,
}

impl std::fmt::Debug for Cloner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloner")
            .field("git_path", &self.git_path)
            .field("timeout", &self.timeout)
            .field("runner", &"<dyn CommandRunner>")
            .finish()
    }
}

impl Default for Cloner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cloner {
    /// Create a cloner that runs real git processes with default settings
    pub fn new() -> Self {
        Self {
            runner: Arc::new(ProcessRunner::new()),
            git_path: DEFAULT_GIT_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a cloner from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_git_path(&config.git.path)
            .with_timeout(config.clone.timeout)
    }

    /// Use a different command runner
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Set a custom path to the git executable
    pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Set the deadline covering a whole operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The configured git executable
    pub fn git_path(&self) -> &str {
        &self.git_path
    }

    /// Plan the commands for `config` without running anything
    pub fn plan(&self, config: &CloneConfig, token: Option<&str>) -> Result<ClonePlan> {
        ClonePlan::new(config, token, &self.git_path)
    }

    /// Clone a repository into `config.local_path`
    ///
    /// Partially-created directories are left in place on failure; cleanup
    /// belongs to the caller.
    pub async fn clone_repo(&self, config: &CloneConfig, token: Option<&str>) -> Result<()> {
        self.with_deadline(self.run_clone(config, token)).await
    }

    /// Check whether a remote repository is reachable
    pub async fn repo_exists(&self, url: &str, token: Option<&str>) -> Result<bool> {
        self.with_deadline(async {
            ensure_git_installed(self.runner.as_ref(), &self.git_path).await?;
            check_repo_exists(self.runner.as_ref(), &self.git_path, url, token).await
        })
        .await
    }

    /// List the branches of a remote repository
    pub async fn remote_branches(&self, url: &str, token: Option<&str>) -> Result<Vec<String>> {
        self.with_deadline(async {
            ensure_git_installed(self.runner.as_ref(), &self.git_path).await?;
            list_remote_branches(self.runner.as_ref(), &self.git_path, url, token).await
        })
        .await
    }

    async fn with_deadline<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    async fn run_clone(&self, config: &CloneConfig, token: Option<&str>) -> Result<()> {
        // Plan first so a bad token fails before any process runs
        let plan = self.plan(config, token)?;
        let runner = self.runner.as_ref();

        ensure_git_installed(runner, &self.git_path).await?;
        ensure_parent_dir(&config.local_path).await?;

        if !check_repo_exists(runner, &self.git_path, &config.url, token).await? {
            return Err(Error::RepositoryNotFound {
                url: config.url.clone(),
            });
        }

        info!(
            url = %config.url,
            local_path = %config.local_path.display(),
            partial = config.partial_clone(),
            shallow = config.shallow(),
            "Cloning repository"
        );

        runner.run(plan.clone_command()).await?;

        if let Some(cmd) = plan.sparse_checkout_command() {
            debug!(pattern = %sparse_pattern(config), "Configuring sparse checkout");
            runner.run(cmd).await?;
        }

        if let Some(cmd) = plan.checkout_command() {
            debug!(commit = ?config.commit, "Checking out commit");
            runner.run(cmd).await?;
        }

        info!(local_path = %config.local_path.display(), "Clone complete");
        Ok(())
    }
}

async fn ensure_parent_dir(local_path: &Path) -> Result<()> {
    if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
