//! Categorized in-memory caching with dependency-based invalidation.
//!
//! The [`CacheManager`] stores type-erased payloads in five categories, each
//! with hit/miss/invalidation statistics. File events are classified by the
//! [`FileClassifier`] and mapped to the categories they invalidate; every
//! event also sweeps entries that list the changed file as a dependency.

#![warn(missing_docs)]

pub mod category;
pub mod classify;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod manager;
pub mod stats;

pub use category::CacheCategory;
pub use classify::{Classification, FileClassifier, FileEvent, FileEventKind, FileType};
pub use entry::CacheEntry;
pub use error::CacheError;
pub use fingerprint::{ChangeSet, FingerprintRegistry};
pub use manager::{CacheManager, InvalidationOutcome};
pub use stats::CategoryStats;
