//! Locating the site and rendering diagnostics, shared by all subcommands.

use std::path::{Path, PathBuf};

use tome_config::CONFIG_FILE;
use tome_diagnostics::{Diagnostic, DiagnosticRenderer, TerminalRenderer};
use tome_site::SiteContext;

use crate::GlobalArgs;

/// Walks up from `start` to the first directory holding `tome.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start;
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current.to_path_buf());
        }
        current = current.parent().ok_or_else(|| {
            format!(
                "no {CONFIG_FILE} found in {} or any parent directory",
                start.display()
            )
        })?;
    }
}

/// Builds the site context from `--config`, or from the nearest project root.
///
/// `--config` may name the configuration file itself or its directory.
pub fn open_site(global: &GlobalArgs) -> Result<SiteContext, Box<dyn std::error::Error>> {
    let site = match &global.config {
        Some(config) => {
            let path = PathBuf::from(config);
            if path.is_file() {
                SiteContext::from_config_file(&path)?
            } else {
                SiteContext::load(&path)?
            }
        }
        None => SiteContext::load(&find_project_root(&std::env::current_dir()?)?)?,
    };
    tracing::debug!(root = %site.config().root_dir.display(), "opened site");
    Ok(site)
}

/// Writes diagnostics to stderr.
pub fn render_diagnostics(diagnostics: &[Diagnostic], color: bool) {
    let renderer = TerminalRenderer::new(color);
    for diag in diagnostics {
        eprint!("{}", renderer.render(diag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: config.map(|p| p.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn find_root_in_current_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "").unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_root_in_parent() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "").unwrap();
        let nested = tmp.path().join("docs/guide");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn open_site_from_config_file_or_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        let config = tmp.path().join(CONFIG_FILE);
        fs::write(&config, "[paths]\ndocs = \"docs\"\n").unwrap();

        let from_file = open_site(&global(Some(&config))).unwrap();
        assert_eq!(from_file.registry().len(), 1);
        let from_dir = open_site(&global(Some(tmp.path()))).unwrap();
        assert_eq!(from_dir.config().root_dir, tmp.path());
    }

    #[test]
    fn open_site_missing_config_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(open_site(&global(Some(tmp.path()))).is_err());
    }
}
