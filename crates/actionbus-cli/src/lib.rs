//! Command-line runtime for the `actionbus` dispatch tool.
//!
//! The module owns argument parsing, configuration loading, telemetry
//! installation, and command execution. Commands run against a fresh
//! [`actionbus::ActionRegistry`]; configuration loading and the output streams
//! can be substituted so the runtime is testable without spawning a process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use actionbus::{ActionName, ActionRegistry, HandlerCatalog, Manifest, ManifestBootstrap};
use actionbus_config::Config;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod errors;
mod telemetry;

use cli::{Cli, CliCommand};
use config::{ConfigArgumentSplit, ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `actionbus_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--bootstrap-path",
];

const CLI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::run");

/// Bundles the output streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

/// Runs the CLI using the provided arguments and output handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);
    let cli_arguments = prepare_cli_arguments(&args, &split);

    let cli = match Cli::try_parse_from(cli_arguments) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // `--help` and `--version` are successful outcomes.
            return match write!(io.stdout, "{error}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Err(error) => return report(io, &AppError::CliUsage(error)),
    };

    let result = loader
        .load(&split.config_arguments)
        .and_then(|config| {
            telemetry::initialise(&config)?;
            execute(cli.command, &config, io)
        });

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => report(io, &error),
    }
}

fn report<W: Write, E: Write>(io: &mut IoStreams<'_, W, E>, error: &AppError) -> ExitCode {
    writeln!(io.stderr, "{error}").ok();
    ExitCode::FAILURE
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

fn execute<W: Write, E: Write>(
    command: CliCommand,
    config: &Config,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError> {
    match command {
        CliCommand::Run { manifest, strict } => {
            let path = manifest_path(manifest, config);
            run_manifest(&path, strict || config.strict_bootstrap(), io)
        }
        CliCommand::Check { manifest } => {
            let path = manifest_path(manifest, config);
            check_manifest(&path, io)
        }
        CliCommand::Resolve { names } => resolve_names(&names, io),
    }
}

fn manifest_path(explicit: Option<Utf8PathBuf>, config: &Config) -> Utf8PathBuf {
    explicit.unwrap_or_else(|| config.bootstrap_path().to_path_buf())
}

fn run_manifest<W: Write, E: Write>(
    path: &Utf8Path,
    strict: bool,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError> {
    let manifest = Manifest::load(path).map_err(AppError::Bootstrap)?;
    let bootstrap = ManifestBootstrap::new(manifest, HandlerCatalog::with_builtins()).strict(strict);
    let mut registry = ActionRegistry::new();

    info!(target: CLI_TARGET, path = %path, strict, "running bootstrap manifest");
    let summary = bootstrap
        .apply(&mut registry)
        .map_err(AppError::Bootstrap)?;
    writeln!(io.stdout, "{path}: {summary}")?;
    Ok(ExitCode::SUCCESS)
}

fn check_manifest<W: Write, E: Write>(
    path: &Utf8Path,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError> {
    let manifest = Manifest::load(path).map_err(AppError::InvalidManifest)?;
    manifest
        .validate(&HandlerCatalog::with_builtins())
        .map_err(AppError::InvalidManifest)?;
    writeln!(
        io.stdout,
        "{path}: ok ({} assignment(s), {} subscription(s), {} post(s))",
        manifest.assignments.len(),
        manifest.subscriptions.len(),
        manifest.posts.len(),
    )?;
    Ok(ExitCode::SUCCESS)
}

fn resolve_names<W: Write, E: Write>(
    names: &[String],
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError> {
    let registry = ActionRegistry::new();
    for name in names {
        let action = ActionName::new(name.as_str())?;
        writeln!(io.stdout, "{action}\t{}", registry.resolve(action.as_str()))?;
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests;
