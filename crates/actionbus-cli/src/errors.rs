//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use actionbus::{ActionError, BootstrapError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("bootstrap failed: {0}")]
    Bootstrap(BootstrapError),
    #[error("manifest is invalid: {0}")]
    InvalidManifest(BootstrapError),
    #[error("cannot resolve: {0}")]
    InvalidName(#[from] ActionError),
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
}
