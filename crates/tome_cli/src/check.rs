//! `tome check`: validate the configured theme.
//!
//! Composes the configured theme, which loads and validates every theme on
//! its `extends` chain, then reports diagnostics and cache statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tome_cache::CategoryStats;
use tome_config::BuildMode;
use tome_diagnostics::{Diagnostic, Severity};
use tome_site::SiteContext;

use crate::project::{open_site, render_diagnostics};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Machine-readable result of `tome check --format json`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    theme: &'a str,
    mode: BuildMode,
    ok: bool,
    diagnostics: &'a [Diagnostic],
    cache: BTreeMap<&'static str, CategoryReport>,
}

/// One category's counters plus its derived hit rate.
#[derive(Debug, Serialize)]
struct CategoryReport {
    #[serde(flatten)]
    stats: CategoryStats,
    hit_rate: Option<f64>,
}

impl From<CategoryStats> for CategoryReport {
    fn from(stats: CategoryStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

impl<'a> CheckReport<'a> {
    fn from_site(site: &'a SiteContext) -> Self {
        Self {
            theme: &site.config().theme,
            mode: site.config().mode,
            ok: !site.sink().has_errors(),
            diagnostics: site.diagnostics(),
            cache: site
                .cache_stats()
                .into_iter()
                .map(|(category, stats)| (category.as_str(), stats.into()))
                .collect(),
        }
    }
}

/// Runs the `tome check` command.
///
/// Returns exit code 0 if no errors were found, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut site = open_site(global)?;
    let reference = site.config().theme.clone();

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking theme '{reference}'");
    }
    // Failures land in the diagnostic sink.
    let _ = site.combine_theme(&reference);

    let report = CheckReport::from_site(&site);
    match args.format {
        ReportFormat::Text => {
            render_diagnostics(report.diagnostics, global.color);
            if !global.quiet {
                print_summary(&report);
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if report.ok { 0 } else { 1 })
}

fn print_summary(report: &CheckReport<'_>) {
    let count = |severity: Severity| {
        report
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    };
    eprintln!(
        "   Result: {} error(s), {} warning(s)",
        count(Severity::Error),
        count(Severity::Warning)
    );
    for (category, report) in &report.cache {
        let stats = &report.stats;
        let rate = report
            .hit_rate
            .map_or_else(|| "-".to_string(), |r| format!("{:.0}%", r * 100.0));
        eprintln!(
            "   cache {category:<8} hits={} misses={} invalidations={} hit_rate={rate}",
            stats.hits, stats.misses, stats.invalidations
        );
    }
}
