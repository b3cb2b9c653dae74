//! Remote queries: existence checks and branch listing

use tracing::{debug, warn};

use super::auth::auth_args;
use super::command::GitCommand;
use super::runner::CommandRunner;
use crate::{Error, Result};

/// stderr fragments git emits when a remote is missing or access is denied
const NOT_FOUND_SIGNALS: &[&str] = &[
    "not found",
    "does not exist",
    "authentication failed",
    "could not read username",
    "could not read password",
    "terminal prompts disabled",
    "access denied",
    "permission denied",
    "the requested url returned error: 401",
    "the requested url returned error: 403",
    "the requested url returned error: 404",
];

/// Whether git's stderr says "no such repository" or "you may not see it"
pub fn is_not_found_stderr(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    NOT_FOUND_SIGNALS.iter().any(|s| stderr.contains(s))
}

/// `git [-c header] ls-remote`; callers add flags, then [`remote_target`]
fn ls_remote(git_path: &str, url: &str, token: Option<&str>) -> Result<GitCommand> {
    Ok(GitCommand::new(git_path)
        .args(auth_args(token, url)?)
        .arg("ls-remote"))
}

/// Everything after `--end-of-options` is positional, so a URL such as
/// `--upload-pack=...` can never be read as an option.
fn remote_target(cmd: GitCommand, url: &str) -> GitCommand {
    cmd.arg("--end-of-options").arg(url)
}

/// Check whether a remote repository is reachable with the given credentials
///
/// Returns `Ok(false)` when git reports the repository missing or access
/// denied. Any other failure (DNS, TLS, refused connection) is returned as an
/// error so that a broken network is not mistaken for a missing repository.
pub async fn check_repo_exists(
    runner: &dyn CommandRunner,
    git_path: &str,
    url: &str,
    token: Option<&str>,
) -> Result<bool> {
    let cmd = remote_target(ls_remote(git_path, url, token)?, url).arg("HEAD");

    match runner.run(&cmd).await {
        Ok(_) => {
            debug!(url = %url, "Repository is reachable");
            Ok(true)
        }
        Err(Error::Execution { stderr, .. }) if is_not_found_stderr(&stderr) => {
            warn!(url = %url, "Repository not found or access denied");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// List the branch names of a remote repository
///
/// Useful for resolving branch names that contain slashes, where a path like
/// `tree/feature/x/src` is otherwise ambiguous.
pub async fn list_remote_branches(
    runner: &dyn CommandRunner,
    git_path: &str,
    url: &str,
    token: Option<&str>,
) -> Result<Vec<String>> {
    let cmd = remote_target(ls_remote(git_path, url, token)?.arg("--heads"), url);
    let output = runner.run(&cmd).await?;

    Ok(parse_heads(&output.stdout))
}

fn parse_heads(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter_map(|(_, reference)| reference.trim().strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::MockRunner;

    const URL: &str = "https://github.com/foo/bar";

    #[test]
    fn test_not_found_signals() {
        assert!(is_not_found_stderr(
            "remote: Repository not found.\nfatal: repository 'https://github.com/foo/bar/' not found"
        ));
        assert!(is_not_found_stderr(
            "fatal: could not read Username for 'https://github.com': terminal prompts disabled"
        ));
        assert!(is_not_found_stderr(
            "fatal: unable to access 'https://github.com/foo/bar/': The requested URL returned error: 403"
        ));
        assert!(!is_not_found_stderr(
            "fatal: unable to access 'https://github.com/foo/bar/': Could not resolve host: github.com"
        ));
    }

    #[tokio::test]
    async fn test_exists_true() {
        let runner = MockRunner::new().respond("ls-remote", "abc123\tHEAD\n");
        assert!(check_repo_exists(&runner, "git", URL, None).await.unwrap());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].get_args(),
            &["ls-remote", "--end-of-options", URL, "HEAD"]
        );
    }

    #[tokio::test]
    async fn test_option_like_url_stays_positional() {
        let url = "--upload-pack=touch /tmp/owned";
        let runner = MockRunner::new();
        check_repo_exists(&runner, "git", url, None).await.unwrap();
        list_remote_branches(&runner, "git", url, None)
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].get_args(),
            &["ls-remote", "--end-of-options", url, "HEAD"]
        );
        assert_eq!(
            calls[1].get_args(),
            &["ls-remote", "--heads", "--end-of-options", url]
        );
    }

    #[tokio::test]
    async fn test_exists_false_on_not_found() {
        let runner = MockRunner::new().fail(
            "ls-remote",
            128,
            "remote: Repository not found.\nfatal: repository not found",
        );
        assert!(!check_repo_exists(&runner, "git", URL, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_errors_on_network_failure() {
        let runner = MockRunner::new().fail(
            "ls-remote",
            128,
            "fatal: unable to access: Could not resolve host: github.com",
        );
        let err = check_repo_exists(&runner, "git", URL, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution { .. }));
    }

    #[tokio::test]
    async fn test_exists_attaches_auth_header() {
        let runner = MockRunner::new();
        check_repo_exists(&runner, "git", URL, Some("secret"))
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].get_args()[0], "-c");
        assert!(calls[0].get_args()[1].contains(".extraheader=Authorization: Basic "));
    }

    #[tokio::test]
    async fn test_exists_skips_header_for_other_hosts() {
        let runner = MockRunner::new();
        check_repo_exists(&runner, "git", "https://gitlab.com/foo/bar", Some("secret"))
            .await
            .unwrap();
        assert!(!runner.calls()[0].has_arg("-c"));
    }

    #[tokio::test]
    async fn test_list_remote_branches() {
        let runner = MockRunner::new().respond(
            "--heads",
            "1111\trefs/heads/main\n2222\trefs/heads/feature/nested-name\n3333\trefs/heads/dev\n",
        );
        let branches = list_remote_branches(&runner, "git", URL, None)
            .await
            .unwrap();
        assert_eq!(branches, vec!["main", "feature/nested-name", "dev"]);
    }

    #[test]
    fn test_parse_heads_skips_noise() {
        let parsed = parse_heads("warning: redirecting\n4444\trefs/tags/v1\n5555\trefs/heads/x\n");
        assert_eq!(parsed, vec!["x"]);
    }
}
