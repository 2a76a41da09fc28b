//! Resolved theme records.

use std::path::PathBuf;

use tome_diagnostics::Diagnostic;

use crate::manifest::ThemeManifest;

/// Where a theme reference points on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeLocation {
    /// The theme directory.
    pub physical_path: PathBuf,
    /// The last path component, used in log messages.
    pub short_name: String,
}

/// A loaded theme: its manifest plus the contents of its own files.
///
/// Parent themes are not included; composition across the `extends` chain
/// happens in the resolver.
#[derive(Clone, Debug)]
pub struct ThemeConfig {
    /// The manifest name.
    pub name: String,
    /// The reference this theme was loaded under.
    pub reference: String,
    /// The theme directory.
    pub path: PathBuf,
    /// The manifest file that was read.
    pub manifest_path: PathBuf,
    /// The parsed manifest.
    pub manifest: ThemeManifest,
    /// This theme's own CSS files, each preceded by its delimiter comment.
    pub combined_css: String,
    /// `(file name, css)` for every listed `.css` file that exists, in order.
    pub per_file_css: Vec<(String, String)>,
    /// The manifest and every listed file, whether or not it exists.
    pub dependencies: Vec<PathBuf>,
    /// Warnings raised while loading.
    pub warnings: Vec<Diagnostic>,
}

/// The delimiter comment written before each composed file.
pub(crate) fn delimiter(theme: &str, file: &str) -> String {
    format!("/* tome: {theme}/{file} */\n")
}

/// Appends one file's CSS to `out` behind its delimiter.
pub(crate) fn push_file(out: &mut String, theme: &str, file: &str, css: &str) {
    out.push_str(&delimiter(theme, file));
    out.push_str(css);
    if !css.ends_with('\n') {
        out.push('\n');
    }
}
