//! A single cached value with its dependencies.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// A cached payload of any type, plus the files it was derived from.
///
/// The payload is stored type-erased; [`payload`](Self::payload) recovers it
/// when the caller asks for the type that was stored.
#[derive(Clone)]
pub struct CacheEntry {
    payload: Arc<dyn Any + Send + Sync>,
    /// Absolute, normalized paths of the files the payload was derived from.
    pub dependencies: Vec<PathBuf>,
    /// When the entry was stored.
    pub created_at: SystemTime,
}

impl CacheEntry {
    /// Wraps `payload` with its dependency list.
    pub fn new<T: Any + Send + Sync>(payload: T, dependencies: Vec<PathBuf>) -> Self {
        Self::from_shared(Arc::new(payload), dependencies)
    }

    /// Wraps an already shared payload.
    pub fn from_shared<T: Any + Send + Sync>(payload: Arc<T>, dependencies: Vec<PathBuf>) -> Self {
        Self {
            payload,
            dependencies,
            created_at: SystemTime::now(),
        }
    }

    /// Returns the payload if it was stored as a `T`.
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.payload).downcast::<T>().ok()
    }

    /// Returns `true` if `path` is one of the dependencies.
    pub fn depends_on(&self, path: &Path) -> bool {
        self.dependencies.iter().any(|d| d == path)
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("dependencies", &self.dependencies)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
