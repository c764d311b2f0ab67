//! Shared configuration for the `actionbus` command.
//!
//! Values are layered by `ortho_config`, lowest precedence first: built-in
//! defaults, a TOML configuration file (`--config-path` or
//! `ACTIONBUS_CONFIG_PATH`), `ACTIONBUS_*` environment variables, and
//! finally command-line flags.

mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_BOOTSTRAP_PATH, DEFAULT_LOG_FILTER, default_bootstrap_path, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ACTIONBUS")]
pub struct Config {
    /// `tracing` filter directive, e.g. `info` or `actionbus=debug`.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log lines.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Manifest applied by `actionbus run` when no path is given.
    #[serde(default = "default_bootstrap_path")]
    pub bootstrap_path: Utf8PathBuf,
    /// Fail the init phase on unrecognised posts and handler failures.
    #[serde(default)]
    pub strict_bootstrap: bool,
}

impl Config {
    /// Returns the log filter directive.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the default bootstrap manifest path.
    #[must_use]
    pub fn bootstrap_path(&self) -> &Utf8Path {
        self.bootstrap_path.as_path()
    }

    /// Returns whether bootstraps run in strict mode.
    #[must_use]
    pub const fn strict_bootstrap(&self) -> bool {
        self.strict_bootstrap
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            bootstrap_path: default_bootstrap_path(),
            strict_bootstrap: false,
        }
    }
}
