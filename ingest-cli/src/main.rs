//! Ingest CLI - Command line interface for ingest
//!
//! Clones remote git repositories (branch, tag, commit or subtree) into a
//! local working copy with as little transfer as possible.

mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};
use ingest_core::git::{is_github_host, validate_github_token};
use ingest_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{BranchesArgs, CloneArgs, ExistsArgs};

/// Ingest: fetch remote repositories into local working copies
#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to git executable (overrides config and env)
    #[arg(long, global = true, env = "INGEST_GIT_PATH")]
    git_path: Option<String>,

    /// Deadline for the whole operation, e.g. "45s" (overrides config and env)
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Access token for private repositories (defaults to GITHUB_TOKEN or the secrets file)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Clone a repository
    #[command(visible_alias = "c")]
    Clone(CloneArgs),

    /// Check whether a repository is reachable
    Exists(ExistsArgs),

    /// List the branches of a remote repository
    Branches(BranchesArgs),

    /// Show current configuration
    Config,
}

fn parse_timeout(input: &str) -> Result<Duration, String> {
    ingest_core::config::parse_duration(input).map_err(|e| e.to_string())
}

/// Pick the token for `url`: --token, then GITHUB_TOKEN, then the secrets file
fn resolve_token(explicit: Option<String>, url: &str) -> anyhow::Result<Option<String>> {
    pick_token(explicit, Secrets::github_token, url)
}

/// Stored credentials are only consulted when --token is absent
fn pick_token(
    explicit: Option<String>,
    stored: impl FnOnce() -> ingest_core::Result<Option<String>>,
    url: &str,
) -> anyhow::Result<Option<String>> {
    let token = match explicit {
        Some(token) => Some(token.trim().to_string()).filter(|t| !t.is_empty()),
        None => stored()?,
    };

    if let Some(ref token) = token {
        if is_github_host(url) {
            validate_github_token(token)?;
        }
    }

    Ok(token)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.git_path.clone(), cli.timeout)?;

    if cli.verbose {
        tracing::info!(
            git_path = %config.git.path,
            timeout = ?config.clone.timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ingest {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Clone(args)) => {
            let token = resolve_token(cli.token, &args.url)?;
            args.execute(cli.verbose, &config, token.as_deref()).await?;
        }
        Some(Commands::Exists(args)) => {
            let token = resolve_token(cli.token, &args.url)?;
            args.execute(&config, token.as_deref()).await?;
        }
        Some(Commands::Branches(args)) => {
            let token = resolve_token(cli.token, &args.url)?;
            args.execute(&config, token.as_deref()).await?;
        }
        Some(Commands::Config) => {
            println!("Ingest Configuration");
            println!("====================");
            println!();
            println!("Git Settings:");
            println!("  path: {}", config.git.path);
            println!();
            println!("Clone Settings:");
            println!("  timeout: {:?}", config.clone.timeout);
            println!("  include_submodules: {}", config.clone.include_submodules);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
            }
        }
        None => {
            println!("Ingest - fetch remote repositories into local working copies");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
