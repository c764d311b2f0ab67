//! Thread-safe handle over an [`ActionRegistry`].
//!
//! Mutations take the write lock. Posting takes the read lock only while the
//! subscriber snapshot is built, so handlers run unlocked and may call back
//! into the same handle.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ActionError;
use crate::event::ActionRef;
use crate::handler::Handler;
use crate::name::CategoryName;
use crate::registry::{ActionRegistry, PostOutcome, SubscriptionId};
use crate::resolver::ActionId;
use crate::value::Value;

/// Cloneable, thread-safe registry handle.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use actionbus::{ActionEvent, HandlerError, SharedRegistry};
///
/// let registry = SharedRegistry::default();
/// registry.assign_category("Tick", "Clock").expect("assign");
///
/// let inner = registry.clone();
/// registry
///     .subscribe(
///         "Clock",
///         Arc::new(move |_: &ActionEvent| -> Result<(), HandlerError> {
///             // Handlers may use the same handle without deadlocking.
///             inner.post("Tock", Vec::new());
///             Ok(())
///         }),
///     )
///     .expect("subscribe");
///
/// assert!(registry.post("Tick", Vec::new()).was_handled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ActionRegistry>>,
}

impl SharedRegistry {
    /// Wraps an existing registry.
    #[must_use]
    pub fn new(registry: ActionRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// See [`ActionRegistry::assign_category`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] for an empty action or category.
    pub fn assign_category(&self, action: &str, category: &str) -> Result<ActionId, ActionError> {
        self.write().assign_category(action, category)
    }

    /// See [`ActionRegistry::unassign`].
    #[expect(
        clippy::must_use_candidate,
        reason = "the former category is informational"
    )]
    pub fn unassign(&self, action: impl Into<ActionRef>) -> Option<CategoryName> {
        self.write().unassign(action)
    }

    /// See [`ActionRegistry::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] for an empty category.
    pub fn subscribe(
        &self,
        category: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<SubscriptionId, ActionError> {
        self.write().subscribe(category, handler)
    }

    /// See [`ActionRegistry::unsubscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownSubscription`] for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), ActionError> {
        self.write().unsubscribe(id)
    }

    /// Posts an action. Handlers run after the lock is released.
    #[expect(
        clippy::must_use_candidate,
        reason = "posting is fire-and-forget; the outcome is informational"
    )]
    pub fn post(&self, action: impl Into<ActionRef>, data: Vec<Value>) -> PostOutcome {
        let prepared = self.read().prepare(action, data);
        prepared.run()
    }

    /// Returns the current category of `action`, if assigned.
    #[must_use]
    pub fn category_of(&self, action: impl Into<ActionRef>) -> Option<CategoryName> {
        self.read().category_of(action).cloned()
    }

    /// Returns how many subscriptions `category` has.
    #[must_use]
    pub fn subscriber_count(&self, category: &str) -> usize {
        self.read().subscriber_count(category)
    }

    /// Runs `f` with exclusive access to the underlying registry.
    ///
    /// The write lock is held for the whole call. Do not post from inside
    /// `f` to handlers that use this handle; they would block on the lock.
    #[must_use]
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut ActionRegistry) -> R) -> R {
        f(&mut self.write())
    }

    fn read(&self) -> RwLockReadGuard<'_, ActionRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ActionRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<ActionRegistry> for SharedRegistry {
    fn from(registry: ActionRegistry) -> Self {
        Self::new(registry)
    }
}
