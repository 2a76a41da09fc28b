//! Error types for registry initialization and alias resolution.

use std::path::PathBuf;

/// Errors that can occur while building the registry or resolving references.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The key is used internally for layout categories and cannot be registered.
    #[error("path key '{0}' is reserved")]
    ReservedKey(String),

    /// The same key was supplied twice.
    #[error("path key '{0}' is registered more than once")]
    DuplicateKey(String),

    /// The key is empty, starts with the reference marker, or ends with a separator.
    #[error("invalid path key '{0}'")]
    InvalidKey(String),

    /// The directory for a key is not an absolute path.
    #[error("directory for '{key}' must be absolute, got {path}")]
    RelativePath {
        /// The registry key.
        key: String,
        /// The offending path.
        path: PathBuf,
    },

    /// The directory for a key does not exist or is not a directory.
    #[error("directory for '{key}' does not exist: {path}")]
    MissingDirectory {
        /// The registry key.
        key: String,
        /// The missing directory.
        path: PathBuf,
    },

    /// No registered key matches the reference.
    #[error("no path key matches '{reference}' (known keys: {})", format_candidates(.candidates))]
    NotFound {
        /// The reference as given by the caller.
        reference: String,
        /// Every registered key, for diagnostics.
        candidates: Vec<String>,
    },
}

fn format_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        "none".to_string()
    } else {
        candidates.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_candidates() {
        let err = PathError::NotFound {
            reference: "@dat/x".to_string(),
            candidates: vec!["data".to_string(), "docs".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no path key matches '@dat/x' (known keys: data, docs)"
        );
    }

    #[test]
    fn not_found_without_candidates() {
        let err = PathError::NotFound {
            reference: "@x".to_string(),
            candidates: vec![],
        };
        assert!(err.to_string().ends_with("(known keys: none)"));
    }

    #[test]
    fn missing_directory_display() {
        let err = PathError::MissingDirectory {
            key: "docs".to_string(),
            path: PathBuf::from("/nowhere/docs"),
        };
        assert!(err.to_string().contains("/nowhere/docs"));
    }

    #[test]
    fn reserved_key_display() {
        let err = PathError::ReservedKey("layouts".to_string());
        assert_eq!(err.to_string(), "path key 'layouts' is reserved");
    }
}
