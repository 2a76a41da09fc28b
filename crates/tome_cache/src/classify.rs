//! Mapping changed files to the kind of source they are.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tome_common::{is_theme_manifest, is_within, normalize_path};
use tome_paths::{PathCategory, PathRegistry};

use crate::category::CacheCategory;

const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico", "bmp", "woff", "woff2", "ttf",
    "otf", "eot", "pdf", "zip", "mp3", "mp4", "webm", "css", "js",
];

/// What kind of source a changed file is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// A content page.
    Content,
    /// A sidebar or category settings file.
    Settings,
    /// A theme manifest or a file inside a theme directory.
    Theme,
    /// The site configuration or a file inside a config directory.
    Config,
    /// A static asset.
    Asset,
    /// Anything else.
    Unknown,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileType::Content => "content",
            FileType::Settings => "settings",
            FileType::Theme => "theme",
            FileType::Config => "config",
            FileType::Asset => "asset",
            FileType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The result of classifying one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// The kind of file.
    pub file_type: FileType,
    /// `true` if the path lies inside a registered or built-in directory.
    pub watched: bool,
    /// `true` if the path is the site configuration file itself.
    pub site_config: bool,
}

impl Classification {
    /// The categories a change to this file invalidates.
    pub fn categories(&self) -> &'static [CacheCategory] {
        use CacheCategory as C;
        match self.file_type {
            FileType::Content => &[C::Content, C::Sidebar],
            FileType::Settings => &[C::Sidebar, C::Settings],
            FileType::Theme => &[C::Theme],
            FileType::Config if self.site_config => &[C::Config, C::Theme],
            FileType::Config => &[C::Config],
            FileType::Asset => &[],
            FileType::Unknown if self.watched => &[C::Content, C::Sidebar],
            FileType::Unknown => &[],
        }
    }
}

/// Whether a file was changed, added or deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEventKind {
    /// The file's content changed.
    Change,
    /// The file was created.
    Add,
    /// The file was removed.
    Delete,
}

/// A file-system notification delivered by the host's watcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEvent {
    /// What happened.
    pub kind: FileEventKind,
    /// The affected file.
    pub path: PathBuf,
}

impl FileEvent {
    /// A change event.
    pub fn change(path: impl Into<PathBuf>) -> Self {
        Self { kind: FileEventKind::Change, path: path.into() }
    }

    /// An add event.
    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self { kind: FileEventKind::Add, path: path.into() }
    }

    /// A delete event.
    pub fn delete(path: impl Into<PathBuf>) -> Self {
        Self { kind: FileEventKind::Delete, path: path.into() }
    }
}

/// Classifies paths using the registered directories and their categories.
#[derive(Clone, Debug, Default)]
pub struct FileClassifier {
    dirs: Vec<(PathBuf, PathCategory)>,
    builtin_theme_dir: Option<PathBuf>,
    site_config: Option<PathBuf>,
}

impl FileClassifier {
    /// A classifier that knows no directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A classifier over every directory in `registry`.
    pub fn from_registry(registry: &PathRegistry) -> Self {
        Self {
            dirs: registry
                .entries()
                .iter()
                .map(|e| (e.absolute_path.clone(), e.category))
                .collect(),
            ..Self::default()
        }
    }

    /// Treats everything under `dir` as part of the built-in theme.
    pub fn with_builtin_theme_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.builtin_theme_dir = Some(normalize_path(dir.as_ref()));
        self
    }

    /// Marks `path` as the site configuration file.
    pub fn with_site_config(mut self, path: impl AsRef<Path>) -> Self {
        self.site_config = Some(normalize_path(path.as_ref()));
        self
    }

    /// Classifies one path.
    pub fn classify(&self, path: &Path) -> Classification {
        let path = normalize_path(path);
        let owner = self.owner_category(&path);
        let in_builtin = self
            .builtin_theme_dir
            .as_deref()
            .is_some_and(|dir| is_within(&path, dir));
        let site_config = self.site_config.as_deref() == Some(path.as_path());

        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let file_type = if site_config {
            FileType::Config
        } else if is_theme_manifest(file_name) || in_builtin || owner == Some(PathCategory::Theme) {
            FileType::Theme
        } else if is_settings_file(file_name) {
            FileType::Settings
        } else if CONTENT_EXTENSIONS.contains(&extension.as_str()) {
            FileType::Content
        } else if owner == Some(PathCategory::Config) {
            FileType::Config
        } else if ASSET_EXTENSIONS.contains(&extension.as_str())
            || owner == Some(PathCategory::Asset)
        {
            FileType::Asset
        } else {
            FileType::Unknown
        };

        Classification {
            file_type,
            watched: owner.is_some() || in_builtin,
            site_config,
        }
    }

    /// The category of the deepest registered directory containing `path`.
    fn owner_category(&self, path: &Path) -> Option<PathCategory> {
        self.dirs
            .iter()
            .filter(|(dir, _)| is_within(path, dir))
            .max_by_key(|(dir, _)| dir.components().count())
            .map(|(_, category)| *category)
    }
}

fn is_settings_file(file_name: &str) -> bool {
    matches!(
        file_name,
        "_category_.json" | "_category_.yml" | "_category_.yaml" | "_settings.toml"
    ) || file_name.starts_with("sidebars.")
}
