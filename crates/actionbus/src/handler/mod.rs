//! Handler capability, the built-in console handler, and the named catalogue.
//!
//! A [`Handler`] is anything that can process an [`ActionEvent`]. Closures with
//! the matching signature implement the trait directly, so most callers never
//! name a handler type. Manifests refer to handlers by name, resolved through a
//! [`HandlerCatalog`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::event::ActionEvent;

/// Tracing target used by the built-in handlers.
pub(crate) const HANDLER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::handler");

/// Name under which [`LogHandler`] is registered in the default catalogue.
pub const LOG_HANDLER: &str = "log";

/// Failure reported by a handler.
///
/// The registry logs the failure, records it in the dispatch report, and
/// carries on with the remaining subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Capability invoked once per post to a category it is subscribed to.
///
/// Handlers run synchronously on the posting thread. A slow handler delays
/// every handler after it in the same dispatch, and the poster.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use actionbus::{ActionEvent, ActionRegistry, Handler, HandlerError, Value};
///
/// let mut registry = ActionRegistry::new();
/// registry.assign_category("Jump", "Input").expect("assign");
/// let handler: Arc<dyn Handler> = Arc::new(|event: &ActionEvent| -> Result<(), HandlerError> {
///     assert_eq!(event.name().as_str(), "Jump");
///     Ok(())
/// });
/// registry.subscribe("Input", handler).expect("subscribe");
/// assert!(registry.post("Jump", vec![Value::from(1)]).was_handled());
/// ```
pub trait Handler: Send + Sync {
    /// Processes a single action event.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] when the event could not be processed.
    fn handle(&self, event: &ActionEvent) -> Result<(), HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&ActionEvent) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, event: &ActionEvent) -> Result<(), HandlerError> {
        self(event)
    }
}

/// Logs every payload item of the events it receives.
///
/// Each item produces one `info` line of the form
/// `Name (id)[index]: value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl Handler for LogHandler {
    fn handle(&self, event: &ActionEvent) -> Result<(), HandlerError> {
        for (index, value) in event.data().iter().enumerate() {
            info!(
                target: HANDLER_TARGET,
                category = event.category().as_str(),
                "{} ({})[{index}]: {value}",
                event.name(),
                event.id(),
            );
        }
        Ok(())
    }
}

/// Handlers addressable by name.
///
/// # Example
///
/// ```
/// use actionbus::{HandlerCatalog, LOG_HANDLER};
///
/// let catalog = HandlerCatalog::with_builtins();
/// assert!(catalog.get(LOG_HANDLER).is_some());
/// assert!(catalog.get("missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: BTreeMap<String, Arc<dyn Handler>>,
}

impl HandlerCatalog {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue preloaded with the built-in handlers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.insert(LOG_HANDLER, Arc::new(LogHandler));
        catalog
    }

    /// Adds or replaces a named handler, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Option<Arc<dyn Handler>> {
        self.handlers.insert(name.into(), handler)
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).cloned()
    }

    /// Returns `true` when a handler with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the registered handler names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests;
