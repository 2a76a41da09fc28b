//! The categorized cache and its invalidation rules.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tome_common::normalize_path;

use crate::category::CacheCategory;
use crate::classify::{FileClassifier, FileEvent, FileEventKind, FileType};
use crate::entry::CacheEntry;
use crate::fingerprint::{ChangeSet, FingerprintRegistry};
use crate::stats::CategoryStats;

/// What a file event did to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidationOutcome {
    /// The event that was processed.
    pub kind: FileEventKind,
    /// How the file was classified.
    pub file_type: FileType,
    /// Categories cleared wholesale by the classification table.
    pub invalidated: Vec<CacheCategory>,
    /// Entries removed in total, including dependency matches.
    pub removed_entries: usize,
}

#[derive(Debug, Default)]
struct CategoryStore {
    entries: HashMap<String, CacheEntry>,
    stats: CategoryStats,
}

impl CategoryStore {
    fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += removed as u64;
        removed
    }
}

#[derive(Debug)]
struct CombinedCss {
    css: Arc<str>,
    dependencies: Vec<PathBuf>,
}

/// In-memory cache partitioned into [`CacheCategory`] stores.
///
/// Entries are never stat-checked on lookup; staleness is handled entirely
/// by the `on_file_*` events, [`invalidate_by_dependency`] and the explicit
/// [`reconcile`] call. The combined-CSS memo lives beside the `theme`
/// category and is cleared whenever that category is.
///
/// [`invalidate_by_dependency`]: Self::invalidate_by_dependency
/// [`reconcile`]: Self::reconcile
#[derive(Debug, Default)]
pub struct CacheManager {
    stores: [CategoryStore; 5],
    combined_css: HashMap<String, CombinedCss>,
    classifier: FileClassifier,
    fingerprints: Option<FingerprintRegistry>,
}

impl CacheManager {
    /// Creates an empty cache using `classifier` for file events.
    pub fn new(classifier: FileClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    /// Records content fingerprints of dependencies as entries are stored,
    /// enabling [`reconcile`](Self::reconcile).
    pub fn with_fingerprints(mut self) -> Self {
        self.fingerprints = Some(FingerprintRegistry::new());
        self
    }

    /// The classifier used for file events.
    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    /// Looks up a payload, counting a hit or a miss.
    ///
    /// A payload stored under another type counts as a miss.
    pub fn get_cached<T: Any + Send + Sync>(
        &mut self,
        category: CacheCategory,
        key: &str,
    ) -> Option<Arc<T>> {
        let store = &mut self.stores[category.index()];
        store.stats.last_access = Some(SystemTime::now());
        match store.entries.get(key).and_then(CacheEntry::payload::<T>) {
            Some(payload) => {
                store.stats.hits += 1;
                tracing::trace!(%category, key, "cache hit");
                Some(payload)
            }
            None => {
                store.stats.misses += 1;
                tracing::trace!(%category, key, "cache miss");
                None
            }
        }
    }

    /// Stores a payload, replacing any previous entry under the same key,
    /// and returns the shared payload without counting a lookup.
    ///
    /// Dependencies are normalized so that file events match them lexically.
    pub fn set_cache<T: Any + Send + Sync>(
        &mut self,
        category: CacheCategory,
        key: impl Into<String>,
        payload: T,
        dependencies: Vec<PathBuf>,
    ) -> Arc<T> {
        let key = key.into();
        self.stores[category.index()].entries.remove(&key);
        let dependencies = self.track(dependencies);
        tracing::trace!(%category, key = %key, deps = dependencies.len(), "cache store");
        let payload = Arc::new(payload);
        self.stores[category.index()]
            .entries
            .insert(key, CacheEntry::from_shared(Arc::clone(&payload), dependencies));
        payload
    }

    /// Returns `true` if an entry exists, without touching statistics.
    pub fn contains(&self, category: CacheCategory, key: &str) -> bool {
        self.stores[category.index()].entries.contains_key(key)
    }

    /// Number of entries in a category.
    pub fn len(&self, category: CacheCategory) -> usize {
        self.stores[category.index()].entries.len()
    }

    /// Returns `true` if no category holds an entry.
    pub fn is_empty(&self) -> bool {
        self.stores.iter().all(|s| s.entries.is_empty()) && self.combined_css.is_empty()
    }

    /// Returns the memoized combined CSS for a theme reference.
    pub fn combined_css(&self, reference: &str) -> Option<Arc<str>> {
        self.combined_css.get(reference).map(|m| Arc::clone(&m.css))
    }

    /// Memoizes combined CSS with the files of the whole inheritance chain.
    pub fn set_combined_css(
        &mut self,
        reference: impl Into<String>,
        css: impl Into<Arc<str>>,
        dependencies: Vec<PathBuf>,
    ) {
        let reference = reference.into();
        self.combined_css.remove(&reference);
        let dependencies = self.track(dependencies);
        self.combined_css.insert(
            reference,
            CombinedCss {
                css: css.into(),
                dependencies,
            },
        );
    }

    /// Handles a file event of any kind.
    pub fn on_file_event(&mut self, event: &FileEvent) -> InvalidationOutcome {
        let path = normalize_path(&event.path);
        let classification = self.classifier.classify(&path);
        let invalidated = classification.categories().to_vec();

        let mut removed = 0;
        for &category in &invalidated {
            removed += self.clear_category(category);
        }
        removed += self.invalidate_by_dependency(&path);
        if let Some(fingerprints) = &mut self.fingerprints {
            fingerprints.forget(&path);
        }

        tracing::debug!(
            path = %path.display(),
            kind = ?event.kind,
            file_type = %classification.file_type,
            removed,
            "processed file event"
        );
        InvalidationOutcome {
            kind: event.kind,
            file_type: classification.file_type,
            invalidated,
            removed_entries: removed,
        }
    }

    /// Handles a change to an existing file.
    pub fn on_file_change(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::change(path))
    }

    /// Handles a newly created file.
    pub fn on_file_add(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::add(path))
    }

    /// Handles a removed file.
    pub fn on_file_delete(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::delete(path))
    }

    /// Removes every entry, in every category and the memo, that lists
    /// `path` as a dependency. Returns the number of entries removed.
    pub fn invalidate_by_dependency(&mut self, path: &Path) -> usize {
        let path = normalize_path(path);
        let mut removed = 0;
        for store in &mut self.stores {
            let before = store.entries.len();
            store.entries.retain(|_, entry| !entry.depends_on(&path));
            let count = before - store.entries.len();
            store.stats.invalidations += count as u64;
            removed += count;
        }

        let before = self.combined_css.len();
        self.combined_css
            .retain(|_, memo| !memo.dependencies.iter().any(|d| *d == path));
        let memo_removed = before - self.combined_css.len();
        self.stores[CacheCategory::Theme.index()].stats.invalidations += memo_removed as u64;

        removed + memo_removed
    }

    /// Clears one category. Clearing `theme` also clears the combined-CSS memo.
    pub fn clear_category(&mut self, category: CacheCategory) -> usize {
        let store = &mut self.stores[category.index()];
        let mut removed = store.clear();
        if category == CacheCategory::Theme {
            let memo = self.combined_css.len();
            self.combined_css.clear();
            store.stats.invalidations += memo as u64;
            removed += memo;
        }
        if removed > 0 {
            tracing::debug!(%category, removed, "cleared cache category");
        }
        removed
    }

    /// Clears every category and the memo. Statistics are kept.
    pub fn clear_all(&mut self) -> usize {
        let removed = CacheCategory::ALL
            .iter()
            .map(|&category| self.clear_category(category))
            .sum();
        if let Some(fingerprints) = &mut self.fingerprints {
            fingerprints.clear();
        }
        tracing::info!(removed, "cleared all cache categories");
        removed
    }

    /// A snapshot of one category's statistics.
    pub fn stats(&self, category: CacheCategory) -> CategoryStats {
        self.stores[category.index()].stats
    }

    /// Snapshots of every category's statistics, in [`CacheCategory::ALL`] order.
    pub fn all_stats(&self) -> Vec<(CacheCategory, CategoryStats)> {
        CacheCategory::ALL
            .iter()
            .map(|&category| (category, self.stats(category)))
            .collect()
    }

    /// Compares recorded dependency fingerprints, plus `extra` paths, against
    /// the disk and invalidates everything depending on a changed file.
    ///
    /// Returns an empty change set when fingerprinting is disabled.
    pub fn reconcile(&mut self, extra: &[PathBuf]) -> ChangeSet {
        let Some(fingerprints) = &self.fingerprints else {
            return ChangeSet::default();
        };
        let extra: Vec<PathBuf> = extra.iter().map(|p| normalize_path(p)).collect();
        let changes = fingerprints.detect_changes(&extra);

        let changed: Vec<PathBuf> = changes.changed().cloned().collect();
        for path in &changed {
            self.on_file_change(path.clone());
        }
        tracing::info!(
            new = changes.new_files.len(),
            modified = changes.modified_files.len(),
            deleted = changes.deleted_files.len(),
            "reconciled cache fingerprints"
        );
        changes
    }

    /// Normalizes dependencies and fingerprints them.
    ///
    /// A fingerprint another live entry still relies on is kept, so an edit
    /// made since that entry was stored is still reported by `reconcile`.
    fn track(&mut self, dependencies: Vec<PathBuf>) -> Vec<PathBuf> {
        let dependencies: Vec<PathBuf> = dependencies.iter().map(|d| normalize_path(d)).collect();
        let Some(fingerprints) = &self.fingerprints else {
            return dependencies;
        };
        let stale: Vec<PathBuf> = dependencies
            .iter()
            .filter(|dep| !fingerprints.is_tracked(dep) || !self.has_dependents(dep))
            .cloned()
            .collect();
        if let Some(fingerprints) = &mut self.fingerprints {
            for dep in &stale {
                fingerprints.record(dep);
            }
        }
        dependencies
    }

    fn has_dependents(&self, path: &Path) -> bool {
        self.stores
            .iter()
            .any(|store| store.entries.values().any(|entry| entry.depends_on(path)))
            || self
                .combined_css
                .values()
                .any(|memo| memo.dependencies.iter().any(|d| d == path))
    }
}
