//! Manifest and stylesheet checks that produce diagnostics.

use std::path::Path;

use tome_diagnostics::{Diagnostic, DiagnosticCode};

use crate::manifest::{OverrideMode, ThemeManifest};

/// Diagnostics from validating one theme.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    /// Problems that make the theme unusable.
    pub errors: Vec<Diagnostic>,
    /// Problems that only degrade the result.
    pub warnings: Vec<Diagnostic>,
    /// Required variables absent from the theme's own CSS.
    pub missing_variables: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a theme against its own files.
///
/// `dir` is the theme directory and `manifest_path` the manifest file the
/// diagnostics point at. Required variables are probed with the substring
/// `"<name>:"` in `own_css`; a variable the theme could inherit from a parent
/// is only a warning.
pub fn validate(
    dir: &Path,
    manifest_path: &Path,
    manifest: &ThemeManifest,
    own_css: &str,
    has_parent: bool,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for file in &manifest.files {
        let path = dir.join(file);
        if !path.is_file() {
            report.warnings.push(
                Diagnostic::warning(
                    DiagnosticCode::MISSING_FILE,
                    format!("theme '{}' lists '{file}' but it does not exist", manifest.name),
                )
                .with_file(&path),
            );
        }
    }

    let can_inherit = has_parent && manifest.override_mode != OverrideMode::Replace;
    for variable in manifest.required_variables.iter() {
        if own_css.contains(&format!("{variable}:")) {
            continue;
        }
        report.missing_variables.push(variable.to_string());
        let message = format!(
            "theme '{}' does not define required variable '{variable}'",
            manifest.name
        );
        if can_inherit {
            report.warnings.push(
                Diagnostic::warning(DiagnosticCode::MISSING_VARIABLE, message)
                    .with_file(manifest_path)
                    .with_note("it may be inherited from the parent theme"),
            );
        } else {
            report
                .errors
                .push(Diagnostic::error(DiagnosticCode::MISSING_VARIABLE, message).with_file(manifest_path));
        }
    }

    if !is_semver_like(&manifest.version) {
        report.warnings.push(
            Diagnostic::warning(
                DiagnosticCode::VERSION_FORMAT,
                format!(
                    "theme '{}' version '{}' is not of the form MAJOR[.MINOR[.PATCH]]",
                    manifest.name, manifest.version
                ),
            )
            .with_file(manifest_path),
        );
    }

    report
}

/// `N`, `N.N` or `N.N.N`, optionally followed by `-pre` and/or `+build`.
fn is_semver_like(version: &str) -> bool {
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);
    let parts: Vec<&str> = core.split('.').collect();
    let core_ok = (1..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    let suffix_ok = suffix.split(['-', '+']).skip(1).all(|s| {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.')
    });
    core_ok && suffix_ok
}
