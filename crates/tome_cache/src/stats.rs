//! Per-category cache statistics.

use std::time::SystemTime;

use serde::Serialize;

/// Counters for one cache category.
///
/// `hits + misses` equals the number of lookups against the category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Lookups that returned a payload.
    pub hits: u64,
    /// Lookups that found nothing, or found a payload of another type.
    pub misses: u64,
    /// Entries removed by invalidation or clearing.
    pub invalidations: u64,
    /// Time of the most recent lookup.
    pub last_access: Option<SystemTime>,
}

impl CategoryStats {
    /// Fraction of lookups that hit, or `None` before the first lookup.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        (total > 0).then(|| self.hits as f64 / total as f64)
    }
}
