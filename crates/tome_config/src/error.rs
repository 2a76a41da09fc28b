//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `tome.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A `paths` key is reserved for internal layout categories.
    #[error("path key '{0}' is reserved and cannot be used in `paths`")]
    ReservedKey(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
