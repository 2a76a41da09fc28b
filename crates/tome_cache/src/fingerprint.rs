//! Content fingerprints of dependency files and change detection.
//!
//! Fingerprints are recorded when entries are stored, and compared only when
//! the host asks for a reconciliation. Lookups never touch the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tome_common::ContentHash;

use crate::error::CacheError;

/// Result of comparing current file contents against recorded fingerprints.
///
/// Files are grouped into new (absent when recorded or never seen), modified
/// (hash changed), deleted (recorded but unreadable now), and unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files that did not exist, or were not tracked, when last recorded.
    pub new_files: Vec<PathBuf>,
    /// Files whose content hash differs from the recorded one.
    pub modified_files: Vec<PathBuf>,
    /// Files that were recorded but can no longer be read.
    pub deleted_files: Vec<PathBuf>,
    /// Files whose content hash matches.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if nothing was added, modified or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Every new, modified or deleted file.
    pub fn changed(&self) -> impl Iterator<Item = &PathBuf> {
        self.new_files
            .iter()
            .chain(&self.modified_files)
            .chain(&self.deleted_files)
    }
}

/// Recorded content hashes, keyed by absolute path.
///
/// A `None` fingerprint means the file did not exist when it was recorded,
/// which lets a missing theme file that later appears count as new.
#[derive(Debug, Default, Clone)]
pub struct FingerprintRegistry {
    hashes: HashMap<PathBuf, Option<ContentHash>>,
}

impl FingerprintRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the content hash of a single file.
    pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
        let content = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Records the current fingerprint of `path`, replacing any held one.
    pub fn record(&mut self, path: &Path) {
        self.hashes
            .insert(path.to_path_buf(), Self::hash_file(path).ok());
    }

    /// Drops the fingerprint of `path`, so the next store re-records it.
    pub fn forget(&mut self, path: &Path) {
        self.hashes.remove(path);
    }

    /// Returns `true` if `path` has a recorded fingerprint.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.hashes.contains_key(path)
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Drops every fingerprint.
    pub fn clear(&mut self) {
        self.hashes.clear();
    }

    /// Compares every tracked path, plus `extra`, against the disk.
    ///
    /// Recorded fingerprints are not updated; the caller decides what to
    /// forget once it has acted on the result.
    pub fn detect_changes(&self, extra: &[PathBuf]) -> ChangeSet {
        let mut set = ChangeSet::default();
        let untracked = extra.iter().filter(|p| !self.hashes.contains_key(*p));
        let candidates = self.hashes.keys().chain(untracked);

        for path in candidates {
            let current = Self::hash_file(path).ok();
            match (self.hashes.get(path).copied().flatten(), current) {
                (Some(old), Some(new)) if old == new => set.unchanged_files.push(path.clone()),
                (Some(_), Some(_)) => set.modified_files.push(path.clone()),
                (Some(_), None) => set.deleted_files.push(path.clone()),
                (None, Some(_)) => set.new_files.push(path.clone()),
                (None, None) => {}
            }
        }

        set.new_files.sort();
        set.modified_files.sort();
        set.deleted_files.sort();
        set.unchanged_files.sort();
        set.new_files.dedup();
        set
    }
}
