//! Theme manifest parsing.
//!
//! Manifests are read into a loosely typed raw record first, so that a YAML
//! `version: 1.0` or a missing field produces a precise message, and are then
//! validated once into a [`ThemeManifest`].

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tome_common::{normalize_path, THEME_MANIFEST_FILES};

use crate::error::ThemeError;

/// How a theme combines with its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideMode {
    /// Parent CSS first, in full, then this theme's CSS.
    #[default]
    Merge,
    /// Parent CSS first, minus files this theme redeclares by name.
    Override,
    /// This theme's CSS only; the parent is never consulted.
    Replace,
}

impl FromStr for OverrideMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(OverrideMode::Merge),
            "override" => Ok(OverrideMode::Override),
            "replace" => Ok(OverrideMode::Replace),
            other => Err(format!(
                "invalid override_mode '{other}' (expected merge, override or replace)"
            )),
        }
    }
}

impl fmt::Display for OverrideMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideMode::Merge => "merge",
            OverrideMode::Override => "override",
            OverrideMode::Replace => "replace",
        })
    }
}

/// CSS custom properties a theme promises to define, grouped by purpose.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequiredVariables {
    /// Color variables, e.g. `--color-primary`.
    pub colors: Vec<String>,
    /// Font variables.
    pub fonts: Vec<String>,
    /// Element-level variables.
    pub elements: Vec<String>,
}

impl RequiredVariables {
    /// Every variable, colors first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors
            .iter()
            .chain(&self.fonts)
            .chain(&self.elements)
            .map(String::as_str)
    }

    /// Returns `true` if no variables are required.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.fonts.is_empty() && self.elements.is_empty()
    }
}

/// A validated theme manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeManifest {
    /// Display name; never empty.
    pub name: String,
    /// Version string as written.
    pub version: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Parent theme reference, if any.
    pub extends: Option<String>,
    /// How this theme combines with its parent.
    pub override_mode: OverrideMode,
    /// Whether the theme ships dark-mode styles.
    pub supports_dark_mode: bool,
    /// Files relative to the theme directory, in composition order.
    pub files: Vec<String>,
    /// Variables the theme must define or inherit.
    pub required_variables: RequiredVariables,
}

/// Scalars that YAML and TOML may produce for a field meant as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<Scalar>,
    description: Option<String>,
    extends: Option<String>,
    override_mode: Option<String>,
    supports_dark_mode: Option<bool>,
    files: Option<Vec<String>>,
    required_variables: Option<RequiredVariables>,
}

impl TryFrom<RawManifest> for ThemeManifest {
    type Error = String;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        let name = raw.name.ok_or("missing required field 'name'")?;
        if name.trim().is_empty() {
            return Err("'name' must not be empty".into());
        }
        let version = raw
            .version
            .ok_or("missing required field 'version'")?
            .into_string();
        let files = raw.files.ok_or("missing required field 'files'")?;
        for file in &files {
            if file.trim().is_empty() {
                return Err("'files' contains an empty entry".into());
            }
            if Path::new(file).is_absolute() {
                return Err(format!("file '{file}' must be relative to the theme directory"));
            }
            if normalize_path(Path::new(file)).components().next() == Some(Component::ParentDir) {
                return Err(format!("file '{file}' escapes the theme directory"));
            }
        }
        let override_mode = match raw.override_mode {
            Some(mode) => mode.parse()?,
            None => OverrideMode::default(),
        };
        let extends = raw.extends.filter(|e| !e.trim().is_empty());

        Ok(ThemeManifest {
            name,
            version,
            description: raw.description,
            extends,
            override_mode,
            supports_dark_mode: raw.supports_dark_mode.unwrap_or(false),
            files,
            required_variables: raw.required_variables.unwrap_or_default(),
        })
    }
}

/// Serialization format of a manifest file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `theme.toml`
    Toml,
    /// `theme.yaml` or `theme.yml`
    Yaml,
}

impl ManifestFormat {
    /// Picks the format from a manifest file's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Toml,
        }
    }
}

/// Returns the highest-priority manifest file in `dir`, if any.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    THEME_MANIFEST_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parses manifest content. `path` is only used in error messages.
pub fn parse_manifest(
    content: &str,
    format: ManifestFormat,
    path: &Path,
) -> Result<ThemeManifest, ThemeError> {
    let invalid = |reason: String| ThemeError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };
    let raw: RawManifest = match format {
        ManifestFormat::Toml => toml::from_str(content).map_err(|e| invalid(e.to_string()))?,
        ManifestFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?
        }
    };
    ThemeManifest::try_from(raw).map_err(invalid)
}

/// Finds and parses the manifest in a theme directory.
///
/// Returns the manifest file's path alongside the parsed manifest.
pub fn load_manifest(dir: &Path) -> Result<(PathBuf, ThemeManifest), ThemeError> {
    let path = find_manifest(dir).ok_or_else(|| ThemeError::NotFound {
        reference: dir.display().to_string(),
        searched: vec![dir.to_path_buf()],
    })?;
    let content = std::fs::read_to_string(&path).map_err(|source| ThemeError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest = parse_manifest(&content, ManifestFormat::from_path(&path), &path)?;
    tracing::debug!(path = %path.display(), name = %manifest.name, "loaded theme manifest");
    Ok((path, manifest))
}
