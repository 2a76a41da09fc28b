//! Shared foundational types used across the Tome documentation core.
//!
//! This crate provides content hashing for change detection and lexical path
//! normalization, so that every crate compares file paths the same way.

#![warn(missing_docs)]

pub mod hash;
pub mod names;
pub mod path;

pub use hash::ContentHash;
pub use names::{is_theme_manifest, THEME_MANIFEST_FILES};
pub use path::{is_within, normalize_path};
