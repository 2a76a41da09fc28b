//! The fixed set of cache categories.

use std::fmt;

use serde::Serialize;

/// A partition of the cache with its own entries and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheCategory {
    /// Rendered or parsed content pages.
    Content,
    /// Sidebar trees derived from content and settings files.
    Sidebar,
    /// Resolved theme configurations.
    Theme,
    /// Per-directory settings such as category metadata.
    Settings,
    /// Values derived from configuration files.
    Config,
}

impl CacheCategory {
    /// Every category, in a stable order.
    pub const ALL: [CacheCategory; 5] = [
        CacheCategory::Content,
        CacheCategory::Sidebar,
        CacheCategory::Theme,
        CacheCategory::Settings,
        CacheCategory::Config,
    ];

    /// Returns the lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheCategory::Content => "content",
            CacheCategory::Sidebar => "sidebar",
            CacheCategory::Theme => "theme",
            CacheCategory::Settings => "settings",
            CacheCategory::Config => "config",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_all_order() {
        for (i, category) in CacheCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(CacheCategory::Sidebar.to_string(), "sidebar");
    }
}
