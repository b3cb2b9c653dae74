//! Sparse-checkout narrowing after a partial clone

use super::config::CloneConfig;
use crate::git::GitCommand;

/// The single directory pattern handed to `git sparse-checkout set`
///
/// Leading slashes are stripped. For blob paths the file's parent directory
/// is used, since sparse-checkout works on directories; a file at the
/// repository root yields `.`. Trailing and doubled slashes around the file
/// name are ignored.
pub fn sparse_pattern(config: &CloneConfig) -> String {
    let subpath = config.subpath.trim_start_matches('/');

    if !config.blob {
        return subpath.to_string();
    }

    let parent = subpath
        .trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent.trim_end_matches('/'))
        .unwrap_or_default();

    if parent.is_empty() {
        ".".to_string()
    } else {
        parent.to_string()
    }
}

/// `git -C <local_path> [-c header] sparse-checkout set --end-of-options <pattern>`
pub(crate) fn sparse_checkout_command(prefix: &GitCommand, config: &CloneConfig) -> GitCommand {
    prefix
        .clone()
        .args(["sparse-checkout", "set", "--end-of-options"])
        .arg(sparse_pattern(config))
}
