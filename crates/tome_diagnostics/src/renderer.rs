//! Diagnostic rendering for terminal output.

use console::Style;

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[T004]: required variable '--x' is not defined by theme 'docs'
///   --> themes/docs/theme.toml
///    = note: a parent theme is expected to provide it
/// ```
pub struct TerminalRenderer {
    /// Whether to style severities for a color terminal.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_severity(&self, severity: Severity) -> String {
        let style = match severity {
            Severity::Error => Style::new().red(),
            Severity::Warning => Style::new().yellow(),
            Severity::Note => Style::new().cyan(),
        };
        style
            .bold()
            .force_styling(self.color)
            .apply_to(severity)
            .to_string()
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.paint_severity(diag.severity),
            diag.code,
            diag.message
        );
        if let Some(file) = &diag.file {
            out.push_str(&format!("  --> {}\n", file.display()));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        out
    }
}
