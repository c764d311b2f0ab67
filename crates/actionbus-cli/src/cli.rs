//! CLI argument definitions for the `actionbus` command.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for the `actionbus` dispatch tool.
#[derive(Parser, Debug)]
#[command(
    name = "actionbus",
    version,
    about = "Applies and inspects action bootstrap manifests",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Structured subcommands for the `actionbus` CLI.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Applies a bootstrap manifest to a fresh registry.
    Run {
        /// Manifest to apply; defaults to the configured bootstrap path.
        #[arg(value_name = "MANIFEST")]
        manifest: Option<Utf8PathBuf>,
        /// Fail on unrecognised posts and handler failures.
        #[arg(long)]
        strict: bool,
    },
    /// Parses and validates a manifest without dispatching anything.
    Check {
        /// Manifest to check; defaults to the configured bootstrap path.
        #[arg(value_name = "MANIFEST")]
        manifest: Option<Utf8PathBuf>,
    },
    /// Prints the id assigned to each action name.
    Resolve {
        /// Action names to resolve.
        #[arg(value_name = "NAME", required = true, num_args = 1..)]
        names: Vec<String>,
    },
}
