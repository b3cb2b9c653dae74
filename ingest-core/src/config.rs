//! Configuration management for ingest
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (INGEST_*)
//! 3. Config file (~/.config/ingest/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clone::{DEFAULT_GIT_PATH, DEFAULT_TIMEOUT};
use crate::{Error, Result};

/// Git executable configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Path to the git executable
    pub path: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_GIT_PATH.to_string(),
        }
    }
}

/// Clone behaviour defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CloneSettings {
    /// Deadline for a whole clone operation (e.g. "60s", "2m")
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Clone submodules unless the request says otherwise
    pub include_submodules: bool,
}

impl Default for CloneSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            include_submodules: false,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Git executable configuration
    pub git: GitConfig,

    /// Clone defaults
    pub clone: CloneSettings,
}

/// Parse a human-readable duration such as `30s` or `1m 30s`
pub fn parse_duration(input: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(input.trim())
        .map_err(|e| Error::Config(format!("Invalid duration '{}': {}", input, e)))
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ingest/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ingest").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - INGEST_GIT_PATH: Path to git executable
    /// - INGEST_TIMEOUT: Clone deadline (e.g. "45s")
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(git_path) = lookup("INGEST_GIT_PATH") {
            self.git.path = git_path;
        }

        if let Some(timeout) = lookup("INGEST_TIMEOUT") {
            self.clone.timeout = parse_duration(&timeout)?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, git_path: Option<String>, timeout: Option<Duration>) -> Self {
        if let Some(path) = git_path {
            self.git.path = path;
        }

        if let Some(t) = timeout {
            self.clone.timeout = t;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(git_path: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(git_path, timeout))
    }
}
