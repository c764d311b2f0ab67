use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Manifest path used when none is configured.
pub const DEFAULT_BOOTSTRAP_PATH: &str = "bootstrap.yaml";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default location of the bootstrap manifest, relative to the working
/// directory.
#[must_use]
pub fn default_bootstrap_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_BOOTSTRAP_PATH)
}
