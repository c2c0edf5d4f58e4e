//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! aliases, and help text. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name = "weld",
    bin_name = "weld",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Declarative workspace generation",
    long_about = "Weld reads declarative project manifests and generates a \
                  fully-formed IDE workspace from them.",
    after_help = "EXAMPLES:\n\
        \x20 weld generate\n\
        \x20 weld generate --path Apps/MyApp\n\
        \x20 weld generate --project-only",
    arg_required_else_help = true,
    subcommand_required = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the workspace from manifests.
    #[command(
        visible_alias = "g",
        about = "Generate the workspace",
        after_help = "EXAMPLES:\n\
            \x20 weld generate\n\
            \x20 weld generate --path Apps/MyApp --project-only"
    )]
    Generate(GenerateArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `weld generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Directory containing the root manifest. Defaults to the current
    /// directory.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        help = "Directory containing the root manifest"
    )]
    pub path: Option<PathBuf>,

    /// Generate project containers only, skipping the workspace container.
    #[arg(long = "project-only", help = "Skip the workspace container")]
    pub project_only: bool,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_structure_is_valid() {
        // clap's internal consistency check — catches conflicts, missing
        // values, etc.
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_with_path() {
        let cli = Cli::parse_from(["weld", "generate", "--path", "Apps/App", "--project-only"]);
        let Commands::Generate(args) = cli.command;
        assert_eq!(args.path, Some(PathBuf::from("Apps/App")));
        assert!(args.project_only);
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["weld", "g"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["weld", "--quiet", "--verbose", "generate"]);
        assert!(result.is_err());
    }
}
