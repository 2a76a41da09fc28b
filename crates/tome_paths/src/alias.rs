//! Longest-prefix resolution of symbolic references.
//!
//! A reference is the marker `@` followed by a registered key and an optional
//! sub-path: `@themes/brand/theme.toml`. Keys are tried longest first, so a
//! key `data` never shadows a more specific key `data2`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tome_common::{is_within, normalize_path};

use crate::error::PathError;
use crate::registry::PathRegistry;

/// The character that marks a string as a symbolic reference.
pub const REFERENCE_MARKER: char = '@';

/// Separator between a key and the residual sub-path.
pub const SEPARATOR: char = '/';

/// The outcome of resolving a symbolic reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAlias {
    /// The registry key that matched.
    pub key: String,
    /// The part of the reference after the key, without the leading separator.
    pub residual_path: String,
    /// The key's directory joined with the residual path.
    pub absolute_path: PathBuf,
}

/// Resolves symbolic references against a [`PathRegistry`].
#[derive(Clone, Copy, Debug)]
pub struct AliasResolver<'a> {
    registry: &'a PathRegistry,
}

impl<'a> AliasResolver<'a> {
    /// Creates a resolver over an initialized registry.
    pub fn new(registry: &'a PathRegistry) -> Self {
        Self { registry }
    }

    /// Returns `true` if `s` carries the reference marker.
    pub fn is_reference(s: &str) -> bool {
        s.starts_with(REFERENCE_MARKER)
    }

    /// Resolves a reference strictly.
    ///
    /// The leading marker is optional. Used for theme and layout references,
    /// where an unknown key is a configuration error: the error lists every
    /// registered key.
    pub fn resolve(&self, reference: &str) -> Result<ResolvedAlias, PathError> {
        let bare = reference.strip_prefix(REFERENCE_MARKER).unwrap_or(reference);
        match self.match_key(bare) {
            Some(resolved) => {
                tracing::debug!(reference, key = %resolved.key, "resolved path reference");
                Ok(resolved)
            }
            None => Err(PathError::NotFound {
                reference: reference.to_string(),
                candidates: self.registry.entries().iter().map(|e| e.key.clone()).collect(),
            }),
        }
    }

    /// Resolves a generic asset URL leniently.
    ///
    /// Strings without the marker, and references whose key is unknown, are
    /// returned unchanged.
    pub fn resolve_lenient<'s>(&self, url: &'s str) -> Cow<'s, str> {
        let Some(bare) = url.strip_prefix(REFERENCE_MARKER) else {
            return Cow::Borrowed(url);
        };
        match self.match_key(bare) {
            Some(resolved) => Cow::Owned(resolved.absolute_path.to_string_lossy().into_owned()),
            None => {
                tracing::debug!(url, "no path key matches; leaving url unchanged");
                Cow::Borrowed(url)
            }
        }
    }

    fn match_key(&self, bare: &str) -> Option<ResolvedAlias> {
        for key in self.registry.keys_by_length() {
            let residual = if bare == key {
                ""
            } else {
                match bare.strip_prefix(key.as_str()).and_then(|r| r.strip_prefix(SEPARATOR)) {
                    Some(residual) => residual,
                    None => continue,
                }
            };
            let entry = self.registry.get(key)?;
            let absolute_path = if residual.is_empty() {
                entry.absolute_path.clone()
            } else {
                normalize_path(&entry.absolute_path.join(Path::new(residual)))
            };
            if !is_within(&absolute_path, &entry.absolute_path) {
                tracing::debug!(key = %key, residual, "reference escapes its directory");
                return None;
            }
            return Some(ResolvedAlias {
                key: key.clone(),
                residual_path: residual.to_string(),
                absolute_path,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PathCategory;
    use crate::registry::PathEntry;
    use std::fs;

    fn registry_with(keys: &[&str]) -> (tempfile::TempDir, PathRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let mut entries = Vec::new();
        for key in keys {
            let path = dir.path().join(key.replace('/', "_"));
            fs::create_dir_all(&path).unwrap();
            entries.push(PathEntry::new(*key, path, PathCategory::Content));
        }
        let mut registry = PathRegistry::new();
        registry.initialize(entries).unwrap();
        (dir, registry)
    }

    #[test]
    fn longer_key_wins() {
        let (dir, registry) = registry_with(&["data", "data2"]);
        let resolved = AliasResolver::new(&registry).resolve("@data2/x").unwrap();
        assert_eq!(resolved.key, "data2");
        assert_eq!(resolved.residual_path, "x");
        assert_eq!(resolved.absolute_path, dir.path().join("data2").join("x"));
    }

    #[test]
    fn shorter_key_still_matches_its_own_paths() {
        let (_dir, registry) = registry_with(&["data", "data2"]);
        let resolved = AliasResolver::new(&registry).resolve("@data/x/y.css").unwrap();
        assert_eq!(resolved.key, "data");
        assert_eq!(resolved.residual_path, "x/y.css");
    }

    #[test]
    fn exact_key_has_empty_residual() {
        let (dir, registry) = registry_with(&["themes"]);
        let resolved = AliasResolver::new(&registry).resolve("@themes").unwrap();
        assert_eq!(resolved.residual_path, "");
        assert_eq!(resolved.absolute_path, dir.path().join("themes"));
    }

    #[test]
    fn prefix_without_separator_does_not_match() {
        let (_dir, registry) = registry_with(&["data"]);
        let err = AliasResolver::new(&registry).resolve("@database").unwrap_err();
        assert!(matches!(err, PathError::NotFound { .. }));
    }

    #[test]
    fn marker_is_optional_for_strict() {
        let (_dir, registry) = registry_with(&["docs"]);
        let resolved = AliasResolver::new(&registry).resolve("docs/intro").unwrap();
        assert_eq!(resolved.key, "docs");
    }

    #[test]
    fn strict_not_found_lists_candidates() {
        let (_dir, registry) = registry_with(&["docs", "themes"]);
        match AliasResolver::new(&registry).resolve("@nope/x") {
            Err(PathError::NotFound { reference, candidates }) => {
                assert_eq!(reference, "@nope/x");
                assert_eq!(candidates, vec!["docs".to_string(), "themes".to_string()]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn lenient_returns_input_when_unknown() {
        let (_dir, registry) = registry_with(&["assets"]);
        let resolver = AliasResolver::new(&registry);
        assert_eq!(resolver.resolve_lenient("@cdn/logo.png"), "@cdn/logo.png");
        assert_eq!(resolver.resolve_lenient("/img/logo.png"), "/img/logo.png");
        assert!(matches!(resolver.resolve_lenient("img.png"), Cow::Borrowed(_)));
    }

    #[test]
    fn residual_cannot_escape_directory() {
        let (dir, registry) = registry_with(&["docs"]);
        let resolver = AliasResolver::new(&registry);
        assert!(matches!(
            resolver.resolve("@docs/../../etc/x"),
            Err(PathError::NotFound { .. })
        ));
        assert_eq!(resolver.resolve_lenient("@docs/../../etc/x"), "@docs/../../etc/x");

        let resolved = resolver.resolve("@docs/guide/../intro.md").unwrap();
        assert_eq!(resolved.absolute_path, dir.path().join("docs/intro.md"));
    }

    #[test]
    fn lenient_resolves_known_keys() {
        let (dir, registry) = registry_with(&["assets"]);
        let resolved = AliasResolver::new(&registry).resolve_lenient("@assets/logo.png");
        assert_eq!(
            resolved,
            dir.path().join("assets/logo.png").to_string_lossy()
        );
    }

    #[test]
    fn residual_is_normalized() {
        let (dir, registry) = registry_with(&["docs"]);
        let resolved = AliasResolver::new(&registry).resolve("@docs/a/../b").unwrap();
        assert_eq!(resolved.absolute_path, dir.path().join("docs/b"));
    }

    #[test]
    fn reinitialize_keeps_resolution() {
        let (dir, mut registry) = registry_with(&["data", "data2"]);
        let before = AliasResolver::new(&registry).resolve("@data2/x").unwrap();
        let same = vec![
            PathEntry::new("data", dir.path().join("data"), PathCategory::Content),
            PathEntry::new("data2", dir.path().join("data2"), PathCategory::Content),
        ];
        assert!(!registry.initialize(same).unwrap());
        let after = AliasResolver::new(&registry).resolve("@data2/x").unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn uninitialized_registry_resolves_nothing() {
        let registry = PathRegistry::new();
        let err = AliasResolver::new(&registry).resolve("@docs").unwrap_err();
        assert!(matches!(err, PathError::NotFound { ref candidates, .. } if candidates.is_empty()));
    }
}
