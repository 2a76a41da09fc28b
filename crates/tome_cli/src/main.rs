//! Tome CLI: inspect a site's path aliases and themes from the terminal.
//!
//! Provides `tome resolve` for symbolic references, `tome theme` for printing
//! a composed stylesheet, and `tome check` for validating the configured
//! theme and reporting diagnostics.

#![warn(missing_docs)]

mod check;
mod project;
mod resolve;
mod theme;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Tome: symbolic paths and theme composition for documentation sites.
#[derive(Parser, Debug)]
#[command(name = "tome", version, about = "Tome documentation site tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tome.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a symbolic reference such as `@themes/brand` to a path.
    Resolve(ResolveArgs),
    /// Print the composed CSS of a theme.
    Theme(ThemeArgs),
    /// Validate the configured theme and report diagnostics.
    Check(CheckArgs),
}

/// Arguments for the `tome resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// The reference to resolve.
    pub reference: String,

    /// Treat the reference as an asset URL: unknown keys pass through.
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for the `tome theme` subcommand.
#[derive(Parser, Debug)]
pub struct ThemeArgs {
    /// Theme reference; defaults to the configured theme.
    pub reference: Option<String>,
}

/// Arguments for the `tome check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or project directory.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The default log filter for these flags; `RUST_LOG` takes precedence.
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Resolve(ref args) => resolve::run(args, &global),
        Command::Theme(ref args) => theme::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn init_logging(global: &GlobalArgs) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(global.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolve() {
        let cli = Cli::parse_from(["tome", "resolve", "@themes/brand"]);
        match cli.command {
            Command::Resolve(ref args) => {
                assert_eq!(args.reference, "@themes/brand");
                assert!(!args.lenient);
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn parse_resolve_lenient() {
        let cli = Cli::parse_from(["tome", "resolve", "--lenient", "@cdn/logo.png"]);
        match cli.command {
            Command::Resolve(ref args) => assert!(args.lenient),
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn parse_theme_default_reference() {
        let cli = Cli::parse_from(["tome", "theme"]);
        match cli.command {
            Command::Theme(ref args) => assert!(args.reference.is_none()),
            _ => panic!("expected Theme command"),
        }
    }

    #[test]
    fn parse_theme_with_reference() {
        let cli = Cli::parse_from(["tome", "theme", "brand"]);
        match cli.command {
            Command::Theme(ref args) => assert_eq!(args.reference.as_deref(), Some("brand")),
            _ => panic!("expected Theme command"),
        }
    }

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["tome", "check"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.format, ReportFormat::Text),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_json() {
        let cli = Cli::parse_from(["tome", "check", "--format", "json"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["tome", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["tome", "--config", "/site/tome.toml", "theme"]);
        assert_eq!(cli.config.as_deref(), Some("/site/tome.toml"));
    }

    #[test]
    fn log_level_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: None,
        };
        assert_eq!(global.log_level(), "warn");
        global.verbose = true;
        assert_eq!(global.log_level(), "debug");
        global.quiet = true;
        assert_eq!(global.log_level(), "error");
    }
}
