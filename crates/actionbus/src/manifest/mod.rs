//! Declarative bootstrap manifests.
//!
//! A [`Manifest`] lists the assignments, subscriptions, and initial posts a
//! host applies during its init phase. It is usually written in YAML:
//!
//! ```yaml
//! assignments:
//!   - action: ExampleAction
//!     category: ScriptCategory
//! subscriptions:
//!   - category: ScriptCategory
//!     handler: log
//! posts:
//!   - action: ExampleAction
//!     data: [foo, 2, -65536]
//! ```
//!
//! Handlers are referenced by name and resolved through a [`HandlerCatalog`].
//! [`ManifestBootstrap`] applies the three sections in order, so posts always
//! see every registration.

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bootstrap::{BOOTSTRAP_TARGET, Bootstrap};
use crate::error::BootstrapError;
use crate::event::ActionRef;
use crate::handler::HandlerCatalog;
use crate::name::{ActionName, CategoryName};
use crate::registry::{ActionRegistry, PostOutcome};
use crate::value::Value;

/// Assigns one action to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentEntry {
    /// Action name.
    pub action: String,
    /// Category the action is routed through.
    pub category: String,
}

/// Subscribes a named handler to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionEntry {
    /// Category to subscribe to.
    pub category: String,
    /// Handler name, looked up in the catalogue.
    pub handler: String,
}

/// An action posted once the registrations are in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostEntry {
    /// Action name.
    pub action: String,
    /// Post by resolved id rather than by name.
    #[serde(default)]
    pub by_id: bool,
    /// Payload items.
    #[serde(default)]
    pub data: Vec<Value>,
}

/// A complete bootstrap document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Applied first.
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
    /// Applied after every assignment.
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionEntry>,
    /// Posted last, in order.
    #[serde(default)]
    pub posts: Vec<PostEntry>,
}

impl Manifest {
    /// Parses a manifest from YAML text.
    ///
    /// An empty document yields an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ParseManifest`] for malformed YAML, unknown
    /// keys, or payload items that are not scalars.
    pub fn from_yaml_str(text: &str) -> Result<Self, BootstrapError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(text).map_err(|err| BootstrapError::ParseManifest {
            message: err.to_string(),
        })
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ReadManifest`] if the file cannot be read and
    /// [`BootstrapError::ParseManifest`] if its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, BootstrapError> {
        let text = std::fs::read_to_string(path).map_err(|source| BootstrapError::ReadManifest {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        debug!(target: BOOTSTRAP_TARGET, path = %path, "loaded bootstrap manifest");
        Self::from_yaml_str(&text)
    }

    /// Checks names and handler references without touching a registry.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in document order.
    pub fn validate(&self, catalog: &HandlerCatalog) -> Result<(), BootstrapError> {
        for entry in &self.assignments {
            ActionName::new(entry.action.as_str())?;
            CategoryName::new(entry.category.as_str())?;
        }
        for entry in &self.subscriptions {
            CategoryName::new(entry.category.as_str())?;
            if !catalog.contains(&entry.handler) {
                return Err(unknown_handler(entry));
            }
        }
        for entry in &self.posts {
            ActionName::new(entry.action.as_str())?;
        }
        Ok(())
    }

    /// Returns `true` when the manifest has nothing to apply.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.subscriptions.is_empty() && self.posts.is_empty()
    }
}

fn unknown_handler(entry: &SubscriptionEntry) -> BootstrapError {
    BootstrapError::UnknownHandler {
        category: entry.category.clone(),
        handler: entry.handler.clone(),
    }
}

/// Counts of what a manifest bootstrap applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootstrapSummary {
    /// Assignments applied.
    pub assignments: usize,
    /// Subscriptions added.
    pub subscriptions: usize,
    /// Posts delivered to at least one handler.
    pub delivered: usize,
    /// Posts whose action had no category.
    pub unrecognized: usize,
    /// Posts whose category had no subscribers.
    pub unhandled: usize,
    /// Handler invocations that failed.
    pub handler_failures: usize,
}

impl BootstrapSummary {
    /// Returns the number of posts attempted.
    #[must_use]
    pub const fn posts(&self) -> usize {
        self.delivered + self.unrecognized + self.unhandled
    }
}

impl fmt::Display for BootstrapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} assignment(s), {} subscription(s), {} post(s) \
             ({} delivered, {} unrecognized, {} unhandled, {} handler failure(s))",
            self.assignments,
            self.subscriptions,
            self.posts(),
            self.delivered,
            self.unrecognized,
            self.unhandled,
            self.handler_failures,
        )
    }
}

/// Applies a [`Manifest`] as the host init hook.
///
/// # Example
///
/// ```
/// use actionbus::{ActionRegistry, HandlerCatalog, Manifest, ManifestBootstrap, run_init};
///
/// let manifest = Manifest::from_yaml_str(
///     "assignments:\n  - action: A\n    category: X\nsubscriptions:\n  - category: X\n    handler: log\n",
/// )
/// .expect("parse");
/// let bootstrap = ManifestBootstrap::new(manifest, HandlerCatalog::with_builtins());
///
/// let mut registry = ActionRegistry::new();
/// assert!(run_init(&bootstrap, &mut registry));
/// assert_eq!(registry.subscriber_count("X"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBootstrap {
    manifest: Manifest,
    catalog: HandlerCatalog,
    strict: bool,
}

impl ManifestBootstrap {
    /// Creates a lenient bootstrap: dropped posts and handler failures are
    /// logged but do not fail the init phase.
    #[must_use]
    pub const fn new(manifest: Manifest, catalog: HandlerCatalog) -> Self {
        Self {
            manifest,
            catalog,
            strict: false,
        }
    }

    /// Makes unrecognised posts and handler failures fatal.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the manifest being applied.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Applies assignments, then subscriptions, then posts.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Registrations applied before it are kept.
    pub fn apply(&self, registry: &mut ActionRegistry) -> Result<BootstrapSummary, BootstrapError> {
        let mut summary = BootstrapSummary::default();

        for entry in &self.manifest.assignments {
            registry.assign_category(&entry.action, &entry.category)?;
            summary.assignments += 1;
        }

        for entry in &self.manifest.subscriptions {
            let handler = self
                .catalog
                .get(&entry.handler)
                .ok_or_else(|| unknown_handler(entry))?;
            registry.subscribe(&entry.category, handler)?;
            summary.subscriptions += 1;
        }

        for entry in &self.manifest.posts {
            ActionName::new(entry.action.as_str())?;
            let reference = if entry.by_id {
                ActionRef::Id(registry.resolve(&entry.action))
            } else {
                ActionRef::from(entry.action.as_str())
            };
            match registry.post(reference, entry.data.clone()) {
                PostOutcome::Unrecognized { .. } => {
                    if self.strict {
                        return Err(BootstrapError::UnrecognizedPost {
                            action: entry.action.clone(),
                        });
                    }
                    summary.unrecognized += 1;
                }
                PostOutcome::NoSubscribers { .. } => summary.unhandled += 1,
                PostOutcome::Delivered(report) => {
                    let failed = report.failures().len();
                    if self.strict && failed > 0 {
                        return Err(BootstrapError::HandlerFailures {
                            action: entry.action.clone(),
                            count: failed,
                        });
                    }
                    summary.delivered += 1;
                    summary.handler_failures += failed;
                }
            }
        }

        if summary.unrecognized + summary.unhandled > 0 {
            warn!(
                target: BOOTSTRAP_TARGET,
                unrecognized = summary.unrecognized,
                unhandled = summary.unhandled,
                "some initial posts reached no handler"
            );
        }
        info!(
            target: BOOTSTRAP_TARGET,
            assignments = summary.assignments,
            subscriptions = summary.subscriptions,
            posts = summary.posts(),
            "applied bootstrap manifest"
        );
        Ok(summary)
    }
}

impl Bootstrap for ManifestBootstrap {
    fn init(&self, registry: &mut ActionRegistry) -> Result<(), BootstrapError> {
        self.apply(registry).map(|_| ())
    }
}
