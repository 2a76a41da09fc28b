//! `tome theme`: print a composed stylesheet.

use crate::project::{open_site, render_diagnostics};
use crate::{GlobalArgs, ThemeArgs};

/// Runs the `tome theme` command.
///
/// Writes the combined CSS to stdout and any diagnostics to stderr. Unlike
/// a development server, a failing theme always exits with 1.
pub fn run(args: &ThemeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut site = open_site(global)?;
    let reference = args
        .reference
        .clone()
        .unwrap_or_else(|| site.config().theme.clone());

    let result = site.combine_theme(&reference);
    if !global.quiet {
        render_diagnostics(site.diagnostics(), global.color);
    }
    match result {
        Ok(css) => {
            print!("{css}");
            Ok(0)
        }
        Err(_) => {
            if global.quiet {
                render_diagnostics(site.diagnostics(), global.color);
            }
            Ok(1)
        }
    }
}
