//! Categories of registered directories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of files a registered directory holds.
///
/// The category decides how a file event under that directory is classified
/// by the cache, and which directories are searched for named themes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCategory {
    /// Documentation pages.
    Content,
    /// Static files served as-is.
    Asset,
    /// Theme directories, each holding one or more themes.
    Theme,
    /// Configuration and settings files.
    Config,
}

impl PathCategory {
    /// All categories, in declaration order.
    pub const ALL: [PathCategory; 4] = [
        PathCategory::Content,
        PathCategory::Asset,
        PathCategory::Theme,
        PathCategory::Config,
    ];

    /// Returns the lowercase name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            PathCategory::Content => "content",
            PathCategory::Asset => "asset",
            PathCategory::Theme => "theme",
            PathCategory::Config => "config",
        }
    }
}

impl fmt::Display for PathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown path category '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_names() {
        for category in PathCategory::ALL {
            assert_eq!(category.as_str().parse::<PathCategory>(), Ok(category));
        }
    }

    #[test]
    fn parse_unknown() {
        assert!("layout".parse::<PathCategory>().is_err());
    }

    #[test]
    fn display_matches_config_name() {
        assert_eq!(PathCategory::Asset.to_string(), "asset");
    }
}
