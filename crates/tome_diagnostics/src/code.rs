//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subsystem that produced a diagnostic, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Theme loading, validation and composition, prefixed with `T`.
    Theme,
    /// Symbolic path resolution, prefixed with `P`.
    Path,
    /// Site configuration, prefixed with `C`.
    Config,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Theme => 'T',
            Category::Path => 'P',
            Category::Config => 'C',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `T003`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// A theme reference could not be located.
    pub const THEME_NOT_FOUND: Self = Self::new(Category::Theme, 1);
    /// A theme manifest violates the schema.
    pub const INVALID_MANIFEST: Self = Self::new(Category::Theme, 2);
    /// A file listed in a theme manifest does not exist.
    pub const MISSING_FILE: Self = Self::new(Category::Theme, 3);
    /// A required CSS variable is not defined by the theme.
    pub const MISSING_VARIABLE: Self = Self::new(Category::Theme, 4);
    /// A theme's `extends` chain loops back onto itself.
    pub const CIRCULAR_INHERITANCE: Self = Self::new(Category::Theme, 5);
    /// A theme version is not semver-like.
    pub const VERSION_FORMAT: Self = Self::new(Category::Theme, 6);
    /// A symbolic reference matched no registered key.
    pub const UNKNOWN_ALIAS: Self = Self::new(Category::Path, 1);
    /// The site configuration could not be applied.
    pub const INVALID_CONFIG: Self = Self::new(Category::Config, 1);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Theme.prefix(), 'T');
        assert_eq!(Category::Path.prefix(), 'P');
        assert_eq!(Category::Config.prefix(), 'C');
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::MISSING_FILE), "T003");
        assert_eq!(format!("{}", DiagnosticCode::UNKNOWN_ALIAS), "P001");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Config, 42)), "C042");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::CIRCULAR_INHERITANCE;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
