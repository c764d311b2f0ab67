//! Host init hook.
//!
//! A host runs its init phase once, against a fresh registry, and only needs
//! to know whether it succeeded. [`run_init`] turns a [`Bootstrap`] result
//! into that flag and logs the cause of any failure.

use tracing::{error, info};

use crate::error::BootstrapError;
use crate::registry::ActionRegistry;

/// Tracing target for the init phase.
pub(crate) const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Registers the host's initial actions, subscriptions, and posts.
///
/// Closures taking `&mut ActionRegistry` implement the trait, which keeps
/// ad-hoc init code short:
///
/// ```
/// use actionbus::{ActionRegistry, BootstrapError, run_init};
///
/// let mut registry = ActionRegistry::new();
/// let ok = run_init(
///     &|registry: &mut ActionRegistry| -> Result<(), BootstrapError> {
///         registry.assign_category("ExampleAction", "ScriptCategory")?;
///         Ok(())
///     },
///     &mut registry,
/// );
/// assert!(ok);
/// assert_eq!(registry.action_count(), 1);
/// ```
pub trait Bootstrap {
    /// Populates the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`BootstrapError`] when initialisation cannot complete.
    /// Registrations applied before the failure are kept.
    fn init(&self, registry: &mut ActionRegistry) -> Result<(), BootstrapError>;
}

impl<F> Bootstrap for F
where
    F: Fn(&mut ActionRegistry) -> Result<(), BootstrapError>,
{
    fn init(&self, registry: &mut ActionRegistry) -> Result<(), BootstrapError> {
        self(registry)
    }
}

/// Runs the init hook and reports success as a flag.
pub fn run_init(bootstrap: &dyn Bootstrap, registry: &mut ActionRegistry) -> bool {
    match bootstrap.init(registry) {
        Ok(()) => {
            info!(
                target: BOOTSTRAP_TARGET,
                actions = registry.action_count(),
                "init hook completed"
            );
            true
        }
        Err(err) => {
            error!(target: BOOTSTRAP_TARGET, "init hook failed: {err}");
            false
        }
    }
}
