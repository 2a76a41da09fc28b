//! Parsing and validation of `tome.toml` site configuration files.
//!
//! The site configuration is owned by the wider build pipeline; this crate
//! reads only what the path/theme core consumes (the `paths` table, the
//! `theme` reference and the `build` table) and produces a strongly typed
//! [`LoadedConfig`] with every directory made absolute.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, LoadedConfig, CONFIG_FILE};
pub use types::*;
