//! Well-known file names shared between the theme loader and the cache.

/// Theme manifest file names, in lookup priority order.
///
/// When a theme directory holds more than one, the earliest in this list wins.
pub const THEME_MANIFEST_FILES: &[&str] = &["theme.toml", "theme.yaml", "theme.yml"];

/// Returns `true` if `file_name` is one of [`THEME_MANIFEST_FILES`].
pub fn is_theme_manifest(file_name: &str) -> bool {
    THEME_MANIFEST_FILES.contains(&file_name)
}
