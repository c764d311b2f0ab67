//! CLI entrypoint for the `actionbus` dispatch tool.
//!
//! The binary delegates to [`actionbus_cli::run`], which loads configuration,
//! installs telemetry, and executes the requested command against a fresh
//! action registry.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    actionbus_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
