//! The process-lifetime registry of named directories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tome_common::{is_within, normalize_path};

use crate::alias::{REFERENCE_MARKER, SEPARATOR};
use crate::category::PathCategory;
use crate::error::PathError;

/// Keys used internally for layout categories. Sites cannot register them.
pub const RESERVED_KEYS: &[&str] = &["layouts", "components", "builtin"];

/// A named directory with its category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathEntry {
    /// The symbolic key, without the reference marker.
    pub key: String,
    /// The absolute directory the key stands for.
    pub absolute_path: PathBuf,
    /// What the directory holds.
    pub category: PathCategory,
}

impl PathEntry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, absolute_path: impl Into<PathBuf>, category: PathCategory) -> Self {
        Self {
            key: key.into(),
            absolute_path: absolute_path.into(),
            category,
        }
    }
}

#[derive(Debug)]
struct Initialized {
    entries: Vec<PathEntry>,
    by_key: HashMap<String, usize>,
    /// Keys sorted by descending length, ties broken lexicographically.
    keys_by_length: Vec<String>,
}

/// Mapping from symbolic keys to absolute directories.
///
/// The registry is populated exactly once by [`initialize`](Self::initialize)
/// and is read-only afterwards. Key order for longest-prefix matching is
/// computed during initialization, so lookups never re-sort.
#[derive(Debug, Default)]
pub struct PathRegistry {
    state: Option<Initialized>,
}

impl PathRegistry {
    /// Creates an empty, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the registry.
    ///
    /// Returns `Ok(true)` when the entries were installed and `Ok(false)` when
    /// the registry was already initialized, in which case the call is a
    /// no-op. On error the registry stays uninitialized.
    pub fn initialize(
        &mut self,
        entries: impl IntoIterator<Item = PathEntry>,
    ) -> Result<bool, PathError> {
        if self.state.is_some() {
            tracing::debug!("path registry already initialized; ignoring");
            return Ok(false);
        }

        let mut validated = Vec::new();
        let mut by_key = HashMap::new();
        for entry in entries {
            validate_key(&entry.key)?;
            if !entry.absolute_path.is_absolute() {
                return Err(PathError::RelativePath {
                    key: entry.key,
                    path: entry.absolute_path,
                });
            }
            if !entry.absolute_path.is_dir() {
                return Err(PathError::MissingDirectory {
                    key: entry.key,
                    path: entry.absolute_path,
                });
            }
            if by_key.insert(entry.key.clone(), validated.len()).is_some() {
                return Err(PathError::DuplicateKey(entry.key));
            }
            validated.push(PathEntry {
                absolute_path: normalize_path(&entry.absolute_path),
                ..entry
            });
        }

        let mut keys_by_length: Vec<String> = validated.iter().map(|e| e.key.clone()).collect();
        keys_by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        tracing::info!(entries = validated.len(), "path registry initialized");
        self.state = Some(Initialized {
            entries: validated,
            by_key,
            keys_by_length,
        });
        Ok(true)
    }

    /// Returns `true` once [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<&PathEntry> {
        let state = self.state.as_ref()?;
        state.by_key.get(key).map(|&i| &state.entries[i])
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[PathEntry] {
        self.state.as_ref().map_or(&[], |s| s.entries.as_slice())
    }

    /// Entries of one category, in registration order.
    pub fn entries_in(&self, category: PathCategory) -> impl Iterator<Item = &PathEntry> {
        self.entries().iter().filter(move |e| e.category == category)
    }

    /// Keys in matching order: longest first.
    pub fn keys_by_length(&self) -> &[String] {
        self.state.as_ref().map_or(&[], |s| s.keys_by_length.as_slice())
    }

    /// Returns the entry whose directory most specifically contains `path`.
    pub fn entry_containing(&self, path: &Path) -> Option<&PathEntry> {
        self.entries()
            .iter()
            .filter(|e| is_within(path, &e.absolute_path))
            .max_by_key(|e| e.absolute_path.components().count())
    }

    /// Returns the category of the directory that most specifically contains `path`.
    pub fn category_of(&self, path: &Path) -> Option<PathCategory> {
        self.entry_containing(path).map(|e| e.category)
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn validate_key(key: &str) -> Result<(), PathError> {
    if key.is_empty() || key.starts_with(REFERENCE_MARKER) || key.ends_with(SEPARATOR) {
        return Err(PathError::InvalidKey(key.to_string()));
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(PathError::ReservedKey(key.to_string()));
    }
    Ok(())
}
