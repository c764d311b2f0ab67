//! Action dispatch registry.
//!
//! The [`ActionRegistry`] owns two relations: which category each action is
//! assigned to, and which handlers are subscribed to each category. Posting an
//! action looks up its category *at post time* and invokes that category's
//! subscribers synchronously, in subscription order.
//!
//! Actions and categories are created implicitly on first use. Re-assigning an
//! action overwrites its category. Subscribing the same handler twice is
//! allowed and makes it run twice per post.

mod dispatch;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ActionError;
use crate::event::{ActionEvent, ActionRef};
use crate::handler::Handler;
use crate::name::{ActionName, CategoryName};
use crate::resolver::{ActionId, DigestResolver, Resolver};
use crate::value::Value;

pub use self::dispatch::{Dispatch, DispatchReport, HandlerFailure, PostOutcome, Prepared};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Identifies one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw subscription number.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw subscription number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Assignment {
    action: ActionName,
    category: CategoryName,
}

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    handler: Arc<dyn Handler>,
}

/// Registry routing posted actions to category subscribers.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use actionbus::{ActionEvent, ActionRegistry, HandlerError, Value};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut registry = ActionRegistry::new();
/// registry.assign_category("A", "X").expect("assign");
/// registry
///     .subscribe(
///         "X",
///         Arc::new(move |event: &ActionEvent| -> Result<(), HandlerError> {
///             sink.lock().expect("lock").push(event.data().to_vec());
///             Ok(())
///         }),
///     )
///     .expect("subscribe");
///
/// let outcome = registry.post("A", vec![Value::from(1), Value::from(2), Value::from(3)]);
/// assert!(outcome.was_handled());
/// assert_eq!(seen.lock().expect("lock").len(), 1);
/// ```
#[derive(Clone)]
pub struct ActionRegistry {
    resolver: Arc<dyn Resolver>,
    assignments: HashMap<ActionId, Assignment>,
    subscriptions: HashMap<CategoryName, Vec<Subscription>>,
    next_subscription: u64,
}

impl ActionRegistry {
    /// Creates an empty registry using the [`DigestResolver`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(DigestResolver))
    }

    /// Creates an empty registry that resolves names with `resolver`.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            assignments: HashMap::new(),
            subscriptions: HashMap::new(),
            next_subscription: 0,
        }
    }

    /// Resolves an action name to its id without touching registry state.
    #[must_use]
    pub fn resolve(&self, name: &str) -> ActionId {
        self.resolver.resolve(name)
    }

    /// Assigns `action` to `category`, replacing any previous assignment.
    ///
    /// Returns the resolved id of the action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] if either name is empty. The
    /// registry is left unchanged.
    pub fn assign_category(&mut self, action: &str, category: &str) -> Result<ActionId, ActionError> {
        let action_name = ActionName::new(action)?;
        let category_name = CategoryName::new(category)?;
        let id = self.resolver.resolve(action_name.as_str());

        if let Some(previous) = self.assignments.get(&id)
            && previous.action != action_name
        {
            warn!(
                target: DISPATCH_TARGET,
                id = id.get(),
                previous = previous.action.as_str(),
                action = action_name.as_str(),
                "action id collision; the newer name replaces the older one"
            );
        }

        debug!(
            target: DISPATCH_TARGET,
            action = action_name.as_str(),
            id = id.get(),
            category = category_name.as_str(),
            "assigned action to category"
        );
        self.assignments.insert(
            id,
            Assignment {
                action: action_name,
                category: category_name,
            },
        );
        Ok(id)
    }

    /// Removes the assignment for `action`, returning its former category.
    ///
    /// Later posts of the action are reported as unrecognised.
    pub fn unassign(&mut self, action: impl Into<ActionRef>) -> Option<CategoryName> {
        let id = self.id_of(&action.into());
        self.assignments
            .remove(&id)
            .map(|assignment| assignment.category)
    }

    /// Appends `handler` to the subscribers of `category`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] if the category name is empty.
    /// The registry is left unchanged.
    pub fn subscribe(
        &mut self,
        category: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<SubscriptionId, ActionError> {
        let category_name = CategoryName::new(category)?;
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        debug!(
            target: DISPATCH_TARGET,
            category = category_name.as_str(),
            subscription = id.get(),
            "subscribed handler"
        );
        self.subscriptions
            .entry(category_name)
            .or_default()
            .push(Subscription { id, handler });
        Ok(id)
    }

    /// Removes a single subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownSubscription`] if no subscription has
    /// this id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), ActionError> {
        let mut emptied = None;
        let mut found = false;
        for (category, subscribers) in &mut self.subscriptions {
            if let Some(position) = subscribers.iter().position(|entry| entry.id == id) {
                subscribers.remove(position);
                found = true;
                if subscribers.is_empty() {
                    emptied = Some(category.clone());
                }
                break;
            }
        }
        if let Some(category) = emptied {
            self.subscriptions.remove(&category);
        }
        if found {
            debug!(target: DISPATCH_TARGET, subscription = id.get(), "unsubscribed handler");
            Ok(())
        } else {
            Err(ActionError::UnknownSubscription { id })
        }
    }

    /// Posts an action and dispatches it synchronously.
    ///
    /// Returns once every subscriber has run. Posting an unassigned action,
    /// or one whose category has no subscribers, is logged and reported in
    /// the outcome; it is never an error.
    #[expect(
        clippy::must_use_candidate,
        reason = "posting is fire-and-forget; the outcome is informational"
    )]
    pub fn post(&self, action: impl Into<ActionRef>, data: Vec<Value>) -> PostOutcome {
        self.prepare(action, data).run()
    }

    /// Routes an action without running any handler.
    ///
    /// The returned [`Dispatch`] holds a snapshot of the subscriber list taken
    /// now; later registry changes do not affect it.
    #[must_use]
    pub fn prepare(&self, action: impl Into<ActionRef>, data: Vec<Value>) -> Prepared {
        let reference = action.into();
        let id = self.id_of(&reference);

        let Some(assignment) = self.assignments.get(&id) else {
            warn!(
                target: DISPATCH_TARGET,
                action = %reference,
                id = id.get(),
                "action has no assigned category"
            );
            return Prepared::Dropped(PostOutcome::Unrecognized { action: reference });
        };

        let handlers: Vec<(SubscriptionId, Arc<dyn Handler>)> = self
            .subscriptions
            .get(&assignment.category)
            .map(|subscribers| {
                subscribers
                    .iter()
                    .map(|entry| (entry.id, Arc::clone(&entry.handler)))
                    .collect()
            })
            .unwrap_or_default();

        if handlers.is_empty() {
            warn!(
                target: DISPATCH_TARGET,
                action = assignment.action.as_str(),
                category = assignment.category.as_str(),
                "category has no subscribed handlers; ignoring action"
            );
            return Prepared::Dropped(PostOutcome::NoSubscribers {
                action: assignment.action.clone(),
                category: assignment.category.clone(),
            });
        }

        debug!(
            target: DISPATCH_TARGET,
            action = assignment.action.as_str(),
            category = assignment.category.as_str(),
            handlers = handlers.len(),
            items = data.len(),
            "dispatching action"
        );
        let event = ActionEvent::new(
            id,
            assignment.action.clone(),
            assignment.category.clone(),
            data,
        );
        Prepared::Ready(Dispatch::new(event, handlers))
    }

    /// Returns the category `action` is currently assigned to.
    #[must_use]
    pub fn category_of(&self, action: impl Into<ActionRef>) -> Option<&CategoryName> {
        let id = self.id_of(&action.into());
        self.assignments
            .get(&id)
            .map(|assignment| &assignment.category)
    }

    /// Returns the name of the assigned action with this id.
    #[must_use]
    pub fn name_from_id(&self, id: ActionId) -> Option<&ActionName> {
        self.assignments
            .get(&id)
            .map(|assignment| &assignment.action)
    }

    /// Returns how many subscriptions `category` has.
    #[must_use]
    pub fn subscriber_count(&self, category: &str) -> usize {
        self.subscriptions.get(category).map_or(0, Vec::len)
    }

    /// Returns the number of assigned actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` when nothing is assigned and nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.subscriptions.is_empty()
    }

    fn id_of(&self, reference: &ActionRef) -> ActionId {
        match reference {
            ActionRef::Name(name) => self.resolver.resolve(name),
            ActionRef::Id(id) => *id,
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("assignments", &self.assignments)
            .field(
                "subscriptions",
                &self
                    .subscriptions
                    .iter()
                    .map(|(category, subscribers)| (category.as_str(), subscribers.len()))
                    .collect::<HashMap<_, _>>(),
            )
            .finish_non_exhaustive()
    }
}
