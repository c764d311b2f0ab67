//! Named-action dispatch core.
//!
//! The `actionbus` crate routes *actions* to *handlers* through an
//! intermediate *category*. A host assigns each action name to one category,
//! subscribes handlers to categories, and posts actions with a payload of
//! primitive [`Value`]s. Every handler subscribed to the action's current
//! category receives the event, synchronously and in subscription order.
//!
//! # Architecture
//!
//! [`ActionRegistry`] is the single-threaded core and owns both relations.
//! [`SharedRegistry`] wraps it for use across threads; posts snapshot the
//! subscriber list and run handlers with the lock released, so handlers may
//! post or re-register without deadlocking.
//!
//! Names map to stable [`ActionId`]s through a [`Resolver`]. The default
//! [`DigestResolver`] hashes the name with SHA-256.
//!
//! A host populates the registry once at start-up through a [`Bootstrap`]
//! implementation. [`ManifestBootstrap`] applies a declarative YAML
//! [`Manifest`] whose handlers are looked up by name in a [`HandlerCatalog`].
//!
//! # Example
//!
//! ```
//! use actionbus::{ActionRegistry, HandlerCatalog, LOG_HANDLER, Value};
//!
//! let catalog = HandlerCatalog::with_builtins();
//! let mut registry = ActionRegistry::new();
//! registry.assign_category("ExampleAction", "ScriptCategory").expect("assign");
//! registry
//!     .subscribe("ScriptCategory", catalog.get(LOG_HANDLER).expect("built-in"))
//!     .expect("subscribe");
//!
//! let outcome = registry.post("ExampleAction", vec![Value::from("foo"), Value::from(2)]);
//! assert!(outcome.was_handled());
//! ```

pub mod bootstrap;
pub mod error;
pub mod event;
pub mod handler;
pub mod manifest;
pub mod name;
pub mod registry;
pub mod resolver;
pub mod shared;
pub mod value;

#[cfg(test)]
mod tests;

pub use self::bootstrap::{Bootstrap, run_init};
pub use self::error::{ActionError, BootstrapError, NameKind};
pub use self::event::{ActionEvent, ActionRef};
pub use self::handler::{Handler, HandlerCatalog, HandlerError, LOG_HANDLER, LogHandler};
pub use self::manifest::{
    AssignmentEntry, BootstrapSummary, Manifest, ManifestBootstrap, PostEntry, SubscriptionEntry,
};
pub use self::name::{ActionName, CategoryName};
pub use self::registry::{
    ActionRegistry, Dispatch, DispatchReport, HandlerFailure, PostOutcome, Prepared, SubscriptionId,
};
pub use self::resolver::{ActionId, DigestResolver, Resolver};
pub use self::shared::SharedRegistry;
pub use self::value::Value;
