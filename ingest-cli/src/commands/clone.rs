//! Clone command - materialize a remote repository locally

use std::path::PathBuf;

use clap::Args;
use ingest_core::clone::ROOT_SUBPATH;
use ingest_core::secrets::GITHUB_TOKEN_ENV;
use ingest_core::{CloneConfig, Cloner, Config, Error};

/// Arguments for the clone command
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Repository URL (e.g. https://github.com/owner/repo)
    #[arg(required = true)]
    pub url: String,

    /// Destination directory
    #[arg(required = true)]
    pub path: PathBuf,

    /// Branch to clone
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Tag to clone (wins over --branch)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Specific commit to check out (full history is fetched)
    #[arg(short, long)]
    pub commit: Option<String>,

    /// Only materialize this subtree
    #[arg(short, long, default_value = ROOT_SUBPATH)]
    pub subpath: String,

    /// The subpath names a single file
    #[arg(long)]
    pub blob: bool,

    /// Clone submodules recursively
    #[arg(long)]
    pub submodules: bool,

    /// Show the git commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl CloneArgs {
    /// Build the clone request, filling defaults from configuration
    pub fn to_clone_config(&self, config: &Config) -> CloneConfig {
        CloneConfig {
            url: self.url.clone(),
            local_path: self.path.clone(),
            commit: self.commit.clone(),
            branch: self.branch.clone(),
            tag: self.tag.clone(),
            subpath: self.subpath.clone(),
            blob: self.blob,
            include_submodules: self.submodules || config.clone.include_submodules,
        }
    }

    /// Execute the clone command
    pub async fn execute(
        &self,
        verbose: bool,
        config: &Config,
        token: Option<&str>,
    ) -> anyhow::Result<()> {
        let clone_config = self.to_clone_config(config);
        let cloner = Cloner::from_config(config);

        if verbose {
            tracing::info!(
                url = %clone_config.url,
                path = %clone_config.local_path.display(),
                subpath = %clone_config.subpath,
                authenticated = token.is_some(),
                timeout = ?cloner.timeout(),
                "Starting clone"
            );
        }

        if self.dry_run {
            let plan = cloner.plan(&clone_config, token)?;

            if self.json {
                let commands: Vec<_> = plan
                    .commands()
                    .map(|cmd| {
                        serde_json::json!({
                            "program": cmd.program(),
                            "args": cmd.redacted_args(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "commands": commands }))?
                );
            } else {
                println!("[Dry run] Would run:");
                for cmd in plan.commands() {
                    println!("  {}", cmd);
                }
            }
            return Ok(());
        }

        cloner
            .clone_repo(&clone_config, token)
            .await
            .map_err(|e| clone_error(e, token.is_some()))?;

        println!(
            "Cloned {} into {}",
            clone_config.url,
            clone_config.local_path.display()
        );
        Ok(())
    }
}

/// Point unauthenticated users at the token options when the remote is hidden
fn clone_error(err: Error, authenticated: bool) -> anyhow::Error {
    if err.is_not_found() && !authenticated {
        anyhow::anyhow!(
            "{} If it is private, set {} or pass --token.",
            err,
            GITHUB_TOKEN_ENV
        )
    } else {
        err.into()
    }
}
