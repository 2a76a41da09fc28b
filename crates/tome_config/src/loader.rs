//! Configuration file loading and validation.

use std::path::{Path, PathBuf};

use tome_common::normalize_path;
use tome_paths::{PathEntry, REFERENCE_MARKER, RESERVED_KEYS, SEPARATOR};

use crate::error::ConfigError;
use crate::types::{BuildMode, SiteConfig, DEFAULT_THEME};

/// File name of the site configuration inside a project directory.
pub const CONFIG_FILE: &str = "tome.toml";

/// Built-in theme location, relative to the configuration directory, when
/// `build.builtin_theme` is not set.
const DEFAULT_BUILTIN_THEME_DIR: &str = "themes/default";

/// A validated configuration with every directory made absolute.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Absolute path of the configuration file, if it was read from disk.
    pub config_path: Option<PathBuf>,
    /// Directory that relative paths were resolved against.
    pub root_dir: PathBuf,
    /// The entry-point theme reference.
    pub theme: String,
    /// The build mode.
    pub mode: BuildMode,
    /// Directory of the built-in `default` theme.
    pub builtin_theme_dir: PathBuf,
    /// Registry entries, in key order.
    pub path_entries: Vec<PathEntry>,
}

/// Loads and validates `tome.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
///
/// Relative paths inside the file are resolved against the file's directory.
pub fn load_config_file(config_path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config_path = if config_path.is_absolute() {
        normalize_path(config_path)
    } else {
        normalize_path(&std::env::current_dir()?.join(config_path))
    };
    let content = std::fs::read_to_string(&config_path)?;
    let root_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));
    let mut loaded = load_config_from_str(&content, &root_dir)?;
    tracing::debug!(path = %config_path.display(), "loaded site configuration");
    loaded.config_path = Some(config_path);
    Ok(loaded)
}

/// Parses and validates a configuration from a string.
///
/// `root_dir` must be absolute; relative directories are joined onto it.
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str, root_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let config: SiteConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;

    let resolve = |dir: &str| normalize_path(&root_dir.join(dir));
    let path_entries = config
        .paths
        .iter()
        .map(|(key, spec)| PathEntry::new(key.clone(), resolve(spec.path()), spec.category(key)))
        .collect();
    let builtin_theme_dir = resolve(
        config
            .build
            .builtin_theme
            .as_deref()
            .unwrap_or(DEFAULT_BUILTIN_THEME_DIR),
    );

    Ok(LoadedConfig {
        config_path: None,
        root_dir: root_dir.to_path_buf(),
        theme: config.theme.unwrap_or_else(|| DEFAULT_THEME.to_string()),
        mode: config.build.mode,
        builtin_theme_dir,
        path_entries,
    })
}

/// Validates keys and values that the registry and resolver rely on.
fn validate_config(config: &SiteConfig) -> Result<(), ConfigError> {
    for (key, spec) in &config.paths {
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ConfigError::ReservedKey(key.clone()));
        }
        if key.is_empty() || key.starts_with(REFERENCE_MARKER) || key.ends_with(SEPARATOR) {
            return Err(ConfigError::ValidationError(format!("invalid path key '{key}'")));
        }
        if spec.path().trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "path for '{key}' is empty"
            )));
        }
    }
    if let Some(theme) = &config.theme {
        if theme.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "theme reference is empty".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_paths::PathCategory;

    fn root() -> PathBuf {
        PathBuf::from("/site")
    }

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str("", &root()).unwrap();
        assert_eq!(config.theme, "default");
        assert_eq!(config.mode, BuildMode::Development);
        assert!(config.path_entries.is_empty());
        assert_eq!(config.builtin_theme_dir, PathBuf::from("/site/themes/default"));
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
title = "Owned elsewhere"
theme = "@themes/brand"

[paths]
docs = "content/docs"
themes = "themes"
brand = { path = "../shared/brand", category = "theme" }
assets = "/var/www/static"

[build]
mode = "production"
builtin_theme = "vendor/default-theme"
"#;
        let config = load_config_from_str(toml, &root()).unwrap();
        assert_eq!(config.theme, "@themes/brand");
        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(
            config.builtin_theme_dir,
            PathBuf::from("/site/vendor/default-theme")
        );

        let find = |key: &str| config.path_entries.iter().find(|e| e.key == key).unwrap();
        assert_eq!(find("docs").absolute_path, PathBuf::from("/site/content/docs"));
        assert_eq!(find("docs").category, PathCategory::Content);
        assert_eq!(find("themes").category, PathCategory::Theme);
        assert_eq!(find("brand").absolute_path, PathBuf::from("/shared/brand"));
        assert_eq!(find("brand").category, PathCategory::Theme);
        assert_eq!(find("assets").absolute_path, PathBuf::from("/var/www/static"));
        assert_eq!(find("assets").category, PathCategory::Asset);
    }

    #[test]
    fn reserved_key_errors() {
        let toml = r#"
[paths]
layouts = "src/layouts"
"#;
        let err = load_config_from_str(toml, &root()).unwrap_err();
        assert!(matches!(err, ConfigError::ReservedKey(ref k) if k == "layouts"));
    }

    #[test]
    fn marker_in_key_errors() {
        let toml = r#"
[paths]
"@docs" = "docs"
"#;
        let err = load_config_from_str(toml, &root()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_theme_errors() {
        let err = load_config_from_str(r#"theme = " ""#, &root()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_category_errors() {
        let toml = r#"
[paths]
docs = { path = "docs", category = "layout" }
"#;
        let err = load_config_from_str(toml, &root()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}", &root()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_disk_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "theme = \"brand\"\n[paths]\ndocs = \"docs\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.config_path, Some(dir.path().join(CONFIG_FILE)));
        assert_eq!(config.root_dir, dir.path());
        assert_eq!(config.path_entries[0].absolute_path, dir.path().join("docs"));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
