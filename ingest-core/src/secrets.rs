//! Access token storage
//!
//! Tokens live outside the main configuration so the config file can be
//! shared freely. The secrets file is `~/.config/ingest/secrets.toml` and must
//! have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variable (GITHUB_TOKEN)
//! 2. Secrets file (~/.config/ingest/secrets.toml)

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Environment variable holding a GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Secrets structure
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,
}

/// GitHub-related secrets
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// GitHub Personal Access Token
    pub token: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("github.token", &self.github.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl std::fmt::Debug for GitHubSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSecrets")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path).map_err(Error::Io)?.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        // Don't echo the parse error: it may quote the token line
        let mut secrets: Secrets = toml::from_str(&contents).map_err(|_| {
            Error::Config(format!("Failed to parse secrets file {}", path.display()))
        })?;

        if let Some(ref mut token) = secrets.github.token {
            *token = token.trim().to_string();
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/ingest/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ingest").join("secrets.toml"))
    }

    /// Get the GitHub token, preferring the GITHUB_TOKEN environment variable
    ///
    /// The secrets file is only read when the environment holds no token, so
    /// a broken or insecure file cannot block an environment token.
    pub fn github_token() -> Result<Option<String>> {
        Self::github_token_from(std::env::var(GITHUB_TOKEN_ENV).ok(), Self::load)
    }

    fn github_token_from(
        env_token: Option<String>,
        load: impl FnOnce() -> Result<Self>,
    ) -> Result<Option<String>> {
        if let Some(token) = env_token.map(|t| t.trim().to_string()) {
            if !token.is_empty() {
                debug!("Using GitHub token from {} environment variable", GITHUB_TOKEN_ENV);
                return Ok(Some(token));
            }
        }

        let secrets = load()?;
        match secrets.github.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                debug!("Using GitHub token from secrets file");
                Ok(Some(token.to_string()))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secrets_with(token: Option<&str>) -> Secrets {
        Secrets {
            github: GitHubSecrets {
                token: token.map(str::to_string),
            },
        }
    }

    fn file_with(token: Option<&'static str>) -> impl FnOnce() -> Result<Secrets> {
        move || Ok(secrets_with(token))
    }

    fn unreadable_file() -> Result<Secrets> {
        Err(Error::Config(
            "Secrets file has insecure permissions 644".to_string(),
        ))
    }

    #[test]
    fn test_default_secrets() {
        let secrets = Secrets::default();
        assert!(secrets.github.token.is_none());
        assert!(Secrets::github_token_from(None, || Ok(Secrets::default()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_env_wins_over_file() {
        assert_eq!(
            Secrets::github_token_from(Some(" from_env \n".to_string()), file_with(Some("from_file")))
                .unwrap(),
            Some("from_env".to_string())
        );
    }

    #[test]
    fn test_env_token_does_not_read_file() {
        let token =
            Secrets::github_token_from(Some("from_env".to_string()), unreadable_file).unwrap();
        assert_eq!(token.as_deref(), Some("from_env"));

        assert!(Secrets::github_token_from(None, unreadable_file).is_err());
    }

    #[test]
    fn test_blank_env_falls_back_to_file() {
        assert_eq!(
            Secrets::github_token_from(Some("   ".to_string()), file_with(Some("from_file")))
                .unwrap(),
            Some("from_file".to_string())
        );
        assert!(Secrets::github_token_from(None, file_with(Some("")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let shown = format!("{:?}", secrets_with(Some("ghp_topsecret")));
        assert!(!shown.contains("topsecret"));
        assert!(shown.contains("<redacted>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"test\"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted_and_trimmed() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"  ghp_test  \"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let secrets = Secrets::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.github.token, Some("ghp_test".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_error_does_not_echo_contents() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = ghp_unquoted_secret").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600)).unwrap();

        let err = Secrets::load_from_file(file.path()).unwrap_err();
        assert!(!err.to_string().contains("ghp_unquoted_secret"));
    }
}
