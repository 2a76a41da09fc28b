//! Lexical path normalization.
//!
//! File events, registry directories and cache dependency lists all name
//! files by path. They are compared after lexical normalization only; the
//! filesystem is never consulted, so deleted files still compare equal.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path lexically: removes `.` components and folds `..`
/// into the preceding normal component.
///
/// A leading `..` on a relative path is kept, since there is nothing to
/// fold it into.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let folded = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if folded {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns `true` if `path` is `dir` itself or lies underneath it.
///
/// Both paths are normalized before comparison.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(dir))
}
