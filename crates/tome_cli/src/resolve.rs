//! `tome resolve`: symbolic reference to physical path.

use crate::project::{open_site, render_diagnostics};
use crate::{GlobalArgs, ResolveArgs};

/// Runs the `tome resolve` command.
///
/// Prints the resolved path on stdout. In strict mode an unknown key prints
/// a diagnostic listing the registered keys and exits with 1.
pub fn run(args: &ResolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut site = open_site(global)?;

    if args.lenient {
        println!("{}", site.resolve_asset_url(&args.reference));
        return Ok(0);
    }

    match site.resolve_alias(&args.reference) {
        Ok(resolved) => {
            println!("{}", resolved.absolute_path.display());
            Ok(0)
        }
        Err(_) => {
            render_diagnostics(site.diagnostics(), global.color);
            Ok(1)
        }
    }
}
