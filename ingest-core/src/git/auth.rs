//! Host recognition and per-invocation auth headers
//!
//! Tokens are turned into a single `-c http.<origin>/.extraheader=...` config
//! override. Nothing is written to disk or to the repository's config, and the
//! header is scoped to the remote's origin rather than every HTTP request git
//! makes.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use tracing::warn;
use url::Url;

use crate::{Error, Result};

/// Username GitHub expects alongside a token in Basic auth
const TOKEN_USER: &str = "x-access-token";

/// Check whether a URL points at GitHub or a GitHub Enterprise host
///
/// Recognizes `github.com` and hosts starting with `github.` (for example
/// `github.mycorp.com`). Unparseable URLs, including scp-style SSH remotes,
/// are never recognized.
pub fn is_github_host(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == "github.com" || host.starts_with("github.")
        }
        None => false,
    }
}

/// Build the git config override that sends the token as Basic auth
///
/// Produces `http.https://<host>/.extraheader=Authorization: Basic <b64>`
/// where `<b64>` encodes `x-access-token:<token>`. The output is a pure
/// function of its inputs.
pub fn create_git_auth_header(token: &str, url: &str) -> Result<String> {
    if token.is_empty() {
        return Err(Error::Auth("Access token is empty".to_string()));
    }

    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(Error::Auth(
            "Access token contains whitespace, control or non-ASCII characters".to_string(),
        ));
    }

    let parsed = Url::parse(url).map_err(|e| Error::Auth(format!("Invalid remote URL: {}", e)))?;

    if parsed.scheme() != "https" {
        return Err(Error::Auth(format!(
            "Token authentication requires an HTTPS remote, got '{}'",
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| Error::Auth("Remote URL has no host".to_string()))?;

    let origin = match parsed.port() {
        Some(port) => format!("https://{}:{}", host, port),
        None => format!("https://{}", host),
    };

    let basic = BASE64.encode(format!("{}:{}", TOKEN_USER, token));
    Ok(format!(
        "http.{}/.extraheader=Authorization: Basic {}",
        origin, basic
    ))
}

/// The `-c <header>` prefix shared by every command of one operation
///
/// Empty when there is no token, the host does not take token headers, or
/// the remote is not HTTPS (the token is never sent in cleartext).
pub fn auth_args(token: Option<&str>, url: &str) -> Result<Vec<String>> {
    match token {
        Some(token) if is_github_host(url) && is_https(url) => {
            Ok(vec!["-c".to_string(), create_git_auth_header(token, url)?])
        }
        Some(_) if is_github_host(url) => {
            warn!(url = %url, "Not sending access token to a non-HTTPS remote");
            Ok(Vec::new())
        }
        _ => Ok(Vec::new()),
    }
}

fn is_https(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| parsed.scheme() == "https")
}

fn github_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:github_pat_|gh[pousr]_)[A-Za-z0-9_]{36,}$")
            .expect("token pattern is a valid regex")
    })
}

/// Check that a token has the shape of a GitHub access token
///
/// Accepts classic (`ghp_`, `gho_`, `ghu_`, `ghs_`, `ghr_`) and fine-grained
/// (`github_pat_`) tokens.
pub fn validate_github_token(token: &str) -> Result<()> {
    if github_token_pattern().is_match(token) {
        Ok(())
    } else {
        Err(Error::Auth("Invalid GitHub token format".to_string()))
    }
}
