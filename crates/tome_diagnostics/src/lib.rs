//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Theme validation and path resolution report content problems as structured
//! [`Diagnostic`] values instead of failing. The [`DiagnosticSink`] keeps them
//! for the lifetime of a site context, deduplicated by file and message, and
//! [`TerminalRenderer`] formats them for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
