//! Remote commands - query a repository without cloning it

use clap::Args;
use ingest_core::{Cloner, Config};

/// Arguments for the exists command
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Repository URL
    #[arg(required = true)]
    pub url: String,
}

impl ExistsArgs {
    /// Execute the exists command
    ///
    /// Exits non-zero when the repository is missing or inaccessible.
    pub async fn execute(&self, config: &Config, token: Option<&str>) -> anyhow::Result<()> {
        let cloner = Cloner::from_config(config);

        if cloner.repo_exists(&self.url, token).await? {
            println!("{}: reachable", self.url);
            Ok(())
        } else {
            anyhow::bail!(
                "{}: not found. Make sure it is public or that you have provided a valid token.",
                self.url
            )
        }
    }
}

/// Arguments for the branches command
#[derive(Args, Debug)]
pub struct BranchesArgs {
    /// Repository URL
    #[arg(required = true)]
    pub url: String,
}

impl BranchesArgs {
    /// Execute the branches command
    pub async fn execute(&self, config: &Config, token: Option<&str>) -> anyhow::Result<()> {
        let cloner = Cloner::from_config(config);

        for branch in cloner.remote_branches(&self.url, token).await? {
            println!("{}", branch);
        }

        Ok(())
    }
}
