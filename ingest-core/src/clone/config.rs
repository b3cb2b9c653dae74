//! Clone configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Subpath meaning "the whole repository"
pub const ROOT_SUBPATH: &str = "/";

/// Branch names that are never passed explicitly to `git clone`
const IMPLICIT_DEFAULT_BRANCHES: &[&str] = &["main", "master"];

/// A fully-resolved request to materialize a repository locally
///
/// Immutable for the duration of one clone operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CloneConfig {
    /// Canonical repository URL
    pub url: String,
    /// Destination directory
    pub local_path: PathBuf,
    /// Specific revision to check out; takes priority over branch and tag
    #[serde(default)]
    pub commit: Option<String>,
    /// Branch to clone
    #[serde(default)]
    pub branch: Option<String>,
    /// Tag to clone; wins over `branch`
    #[serde(default)]
    pub tag: Option<String>,
    /// Subtree to materialize, `/` for everything
    #[serde(default = "default_subpath")]
    pub subpath: String,
    /// Whether `subpath` names a file rather than a directory
    #[serde(default)]
    pub blob: bool,
    /// Whether to clone submodules recursively
    #[serde(default)]
    pub include_submodules: bool,
}

fn default_subpath() -> String {
    ROOT_SUBPATH.to_string()
}

impl CloneConfig {
    /// Clone the default branch of `url` into `local_path`
    pub fn new(url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            commit: None,
            branch: None,
            tag: None,
            subpath: default_subpath(),
            blob: false,
            include_submodules: false,
        }
    }

    /// Select a branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Select a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Select a specific commit
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Restrict the working tree to a subtree
    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = subpath.into();
        self
    }

    /// Mark `subpath` as naming a single file
    pub fn with_blob(mut self, blob: bool) -> Self {
        self.blob = blob;
        self
    }

    /// Clone submodules recursively
    pub fn with_submodules(mut self, include: bool) -> Self {
        self.include_submodules = include;
        self
    }

    /// Whether only a subtree is wanted
    pub fn partial_clone(&self) -> bool {
        self.subpath != ROOT_SUBPATH
    }

    /// Whether a depth-1 clone is possible (no specific commit requested)
    pub fn shallow(&self) -> bool {
        self.commit.is_none()
    }

    /// The ref passed as `--branch`, if any
    ///
    /// `None` whenever a commit is requested. Otherwise the tag wins over the
    /// branch, and `main`/`master` are left implicit.
    pub fn clone_ref(&self) -> Option<&str> {
        if self.commit.is_some() {
            return None;
        }

        if let Some(tag) = self.tag.as_deref() {
            return Some(tag);
        }

        self.branch.as_deref().filter(|branch| {
            !IMPLICIT_DEFAULT_BRANCHES
                .iter()
                .any(|default| branch.eq_ignore_ascii_case(default))
        })
    }
}
