//! Domain errors raised by registry and bootstrap operations.
//!
//! Both enums derive `thiserror` with structured fields so callers can match
//! on the failure instead of parsing messages. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::registry::SubscriptionId;

/// Which kind of identifier failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// An action name.
    Action,
    /// A category name.
    Category,
}

impl NameKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Category => "category",
        }
    }
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors arising from registry operations.
///
/// Posting never produces an [`ActionError`]: unrecognised actions and
/// failing handlers are reported through
/// [`PostOutcome`](crate::registry::PostOutcome) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// An action or category name was empty or whitespace-only.
    #[error("invalid {kind} name '{value}': names must not be empty")]
    InvalidName {
        /// Whether the action or the category name was rejected.
        kind: NameKind,
        /// The rejected value.
        value: String,
    },

    /// The subscription does not exist, or was already removed.
    #[error("subscription {id} is not registered")]
    UnknownSubscription {
        /// Identifier that was looked up.
        id: SubscriptionId,
    },
}

/// Errors that make the init hook report failure to the host.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A registration step was rejected by the registry.
    #[error("registration failed: {0}")]
    Registration(#[from] ActionError),

    /// A subscription referenced a handler the catalogue does not know.
    #[error("subscription for category '{category}' names unknown handler '{handler}'")]
    UnknownHandler {
        /// Category the subscription targeted.
        category: String,
        /// Handler name that was looked up.
        handler: String,
    },

    /// Strict mode: an initial post targeted an action with no category.
    #[error("initial post of '{action}' has no assigned category")]
    UnrecognizedPost {
        /// Action reference as written in the manifest.
        action: String,
    },

    /// Strict mode: handlers failed while processing an initial post.
    #[error("{count} handler(s) failed while dispatching '{action}'")]
    HandlerFailures {
        /// Action that was posted.
        action: String,
        /// Number of failed handler invocations.
        count: usize,
    },

    /// The manifest file could not be read.
    #[error("failed to read bootstrap manifest {path}: {source}")]
    ReadManifest {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The manifest text is not a valid bootstrap document.
    #[error("failed to parse bootstrap manifest: {message}")]
    ParseManifest {
        /// Human-readable description of the parse failure.
        message: String,
    },
}

#[cfg(test)]
mod tests;
