//! Error types for repository ingestion

use std::time::Duration;

use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ingestion operations
///
/// Messages never carry the access token or the auth header value; commands
/// are rendered through [`crate::git::GitCommand`]'s redacting `Display`.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (e.g. creating the destination's parent directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or rejected access token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The existence check reported the repository as missing or inaccessible
    #[error(
        "Repository not found: {url}. Make sure it is public or that you have provided a valid token."
    )]
    RepositoryNotFound {
        /// Repository URL that was checked
        url: String,
    },

    /// A subprocess exited with a non-zero status
    #[error("Command failed: {command} (exit code {}): {stderr}", display_code(.code))]
    Execution {
        /// Redacted command line
        command: String,
        /// Exit code, `None` if the process was killed by a signal
        code: Option<i32>,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// A required executable is missing or unusable
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The overall clone deadline elapsed
    #[error("Operation timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl Error {
    /// Whether this error means the remote could not be found or accessed
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RepositoryNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_display() {
        let err = Error::Execution {
            command: "git clone https://example.com/a/b /tmp/b".to_string(),
            code: Some(128),
            stderr: "fatal: boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 128"));
        assert!(msg.contains("fatal: boom"));
    }

    #[test]
    fn test_execution_display_without_code() {
        let err = Error::Execution {
            command: "git clone".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "Operation timed out after 60s");
    }

    #[test]
    fn test_not_found() {
        let err = Error::RepositoryNotFound {
            url: "https://github.com/foo/bar".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("valid token"));
    }
}
