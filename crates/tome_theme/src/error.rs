//! Error types for theme resolution and composition.

use std::path::PathBuf;

use tome_diagnostics::{Diagnostic, DiagnosticCode};
use tome_paths::PathError;

/// Errors that stop a theme from resolving.
///
/// Problems that only degrade the result, such as a missing stylesheet, are
/// reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// No theme directory with a manifest was found for the reference.
    #[error("theme '{reference}' not found (searched: {})", format_searched(.searched))]
    NotFound {
        /// The reference as given.
        reference: String,
        /// Every directory that was checked.
        searched: Vec<PathBuf>,
    },

    /// The manifest could not be parsed or is missing required fields.
    #[error("invalid theme manifest {path}: {reason}")]
    InvalidManifest {
        /// The manifest file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// A required CSS variable is absent and the theme cannot inherit it.
    #[error("theme '{theme}' does not define required variables: {}", .variables.join(", "))]
    MissingVariable {
        /// The theme name.
        theme: String,
        /// The variables that were not found.
        variables: Vec<String>,
    },

    /// The `extends` chain re-enters a theme already on it.
    #[error("circular theme inheritance: {}", .chain.join(" -> "))]
    CircularInheritance {
        /// References in walk order, ending with the one that closed the cycle.
        chain: Vec<String>,
    },

    /// A symbolic theme reference could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A theme file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl ThemeError {
    /// Converts the error into an error-severity diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            ThemeError::NotFound { .. } => DiagnosticCode::THEME_NOT_FOUND,
            ThemeError::InvalidManifest { .. } => DiagnosticCode::INVALID_MANIFEST,
            ThemeError::MissingVariable { .. } => DiagnosticCode::MISSING_VARIABLE,
            ThemeError::CircularInheritance { .. } => DiagnosticCode::CIRCULAR_INHERITANCE,
            ThemeError::Path(PathError::NotFound { .. }) => DiagnosticCode::UNKNOWN_ALIAS,
            ThemeError::Path(_) => DiagnosticCode::INVALID_CONFIG,
            ThemeError::Io { .. } => DiagnosticCode::MISSING_FILE,
        };
        let diag = Diagnostic::error(code, self.to_string());
        match self {
            ThemeError::InvalidManifest { path, .. } | ThemeError::Io { path, .. } => {
                diag.with_file(path)
            }
            ThemeError::NotFound { searched, .. } if searched.is_empty() => {
                diag.with_note("no theme directories are registered")
            }
            _ => diag,
        }
    }
}

fn format_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "nothing".to_string();
    }
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
