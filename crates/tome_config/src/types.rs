//! Configuration types deserialized from `tome.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tome_paths::PathCategory;

/// The theme used when the configuration names none.
pub const DEFAULT_THEME: &str = "default";

/// The parts of the site configuration consumed by the path/theme core.
///
/// Any other top-level fields belong to the wider pipeline and are ignored.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// The entry-point theme reference. Defaults to the built-in theme.
    #[serde(default)]
    pub theme: Option<String>,
    /// Symbolic key to directory. Relative directories are resolved against
    /// the directory holding the configuration file.
    #[serde(default)]
    pub paths: BTreeMap<String, PathSpec>,
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// A directory declaration in the `paths` table.
///
/// Uses serde's untagged enum to accept either a bare string or a table
/// with an explicit category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    /// `docs = "content/docs"`; the category is inferred from the key.
    Plain(String),
    /// `brand = { path = "brand", category = "theme" }`.
    Detailed {
        /// The directory.
        path: String,
        /// The category; inferred from the key when absent.
        #[serde(default)]
        category: Option<PathCategory>,
    },
}

impl PathSpec {
    /// The directory as written in the configuration.
    pub fn path(&self) -> &str {
        match self {
            PathSpec::Plain(path) | PathSpec::Detailed { path, .. } => path,
        }
    }

    /// The category of the directory, inferring it from `key` if not explicit.
    pub fn category(&self, key: &str) -> PathCategory {
        match self {
            PathSpec::Detailed {
                category: Some(category),
                ..
            } => *category,
            _ => infer_category(key),
        }
    }
}

/// Infers a directory category from its key name.
pub fn infer_category(key: &str) -> PathCategory {
    let key = key.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| key.contains(*n));
    if has(&["theme"]) {
        PathCategory::Theme
    } else if has(&["asset", "static", "image", "media"]) {
        PathCategory::Asset
    } else if has(&["config", "settings"]) {
        PathCategory::Config
    } else {
        PathCategory::Content
    }
}

/// Build settings.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// Development builds degrade on theme failures; production builds report them.
    #[serde(default)]
    pub mode: BuildMode,
    /// Directory of the built-in `default` theme.
    #[serde(default)]
    pub builtin_theme: Option<String>,
}

/// Whether the site is being served for development or built for release.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Live-reloading development server.
    #[default]
    Development,
    /// Release build.
    Production,
}
