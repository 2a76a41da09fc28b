//! Deduplicating diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Accumulates diagnostics for the lifetime of a site context.
///
/// Diagnostics are deduplicated by `(file, message)`: emitting the same
/// problem on every rebuild records it once. The sink is only emptied by
/// [`clear`](Self::clear), which the owning context calls on a full reset.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(Option<PathBuf>, String)>,
    error_count: usize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a diagnostic into the sink.
    ///
    /// Returns `false` if an identical `(file, message)` pair was already
    /// recorded, in which case the diagnostic is dropped.
    pub fn emit(&mut self, diag: Diagnostic) -> bool {
        let (file, message) = diag.dedup_key();
        if !self.seen.insert((file.map(Path::to_path_buf), message.to_string())) {
            return false;
        }
        if diag.severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Emits every diagnostic of an iterator.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// Returns `true` if any error-severity diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Returns the number of error-severity diagnostics recorded.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns the recorded diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Forgets every recorded diagnostic, including the dedup history.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.seen.clear();
        self.error_count = 0;
    }
}
