//! Errors surfaced by the site context.

use tome_config::ConfigError;
use tome_paths::PathError;
use tome_theme::ThemeError;

/// Any error a [`SiteContext`](crate::SiteContext) operation can return.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The site configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Registry initialization or alias resolution failed.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A theme could not be resolved or composed.
    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),
}
