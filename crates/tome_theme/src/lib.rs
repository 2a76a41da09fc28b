//! Theme manifests, inheritance and CSS composition.
//!
//! A theme is a directory holding a manifest (`theme.toml`, `theme.yaml` or
//! `theme.yml`) and the stylesheets it lists. Themes may extend a parent
//! theme; the [`ThemeResolver`] walks the `extends` chain, proves it acyclic,
//! and composes the chain's CSS according to each theme's [`OverrideMode`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod validate;

pub use config::{ThemeConfig, ThemeLocation};
pub use error::ThemeError;
pub use manifest::{
    find_manifest, load_manifest, parse_manifest, ManifestFormat, OverrideMode, RequiredVariables,
    ThemeManifest,
};
pub use resolver::{ThemeResolver, BUILTIN_THEME};
pub use validate::{validate, ValidationReport};
