//! Snapshot-and-run dispatch of a single posted action.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error};

use super::{DISPATCH_TARGET, SubscriptionId};
use crate::event::{ActionEvent, ActionRef};
use crate::handler::Handler;
use crate::name::{ActionName, CategoryName};

/// A routed action together with the subscribers it will be delivered to.
///
/// The handler list is a snapshot taken at post time. Running a `Dispatch`
/// needs no access to the registry, so a shared registry can release its lock
/// before any handler executes.
pub struct Dispatch {
    event: ActionEvent,
    handlers: Vec<(SubscriptionId, Arc<dyn Handler>)>,
}

impl Dispatch {
    pub(crate) const fn new(
        event: ActionEvent,
        handlers: Vec<(SubscriptionId, Arc<dyn Handler>)>,
    ) -> Self {
        Self { event, handlers }
    }

    /// Returns the event that will be delivered.
    #[must_use]
    pub const fn event(&self) -> &ActionEvent {
        &self.event
    }

    /// Returns the number of handlers in the snapshot.
    #[must_use]
    pub const fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Invokes every handler in subscription order.
    ///
    /// A handler that returns an error or panics is logged and recorded in the
    /// report; the remaining handlers still run.
    #[must_use]
    pub fn run(self) -> DispatchReport {
        let mut failures = Vec::new();
        for (subscription, handler) in &self.handlers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&self.event)));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(handler_error)) => Some(handler_error.message().to_owned()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            if let Some(message) = failure {
                error!(
                    target: DISPATCH_TARGET,
                    action = self.event.name().as_str(),
                    category = self.event.category().as_str(),
                    subscription = subscription.get(),
                    "handler failed: {message}"
                );
                failures.push(HandlerFailure {
                    subscription: *subscription,
                    message,
                });
            }
        }

        debug!(
            target: DISPATCH_TARGET,
            action = self.event.name().as_str(),
            category = self.event.category().as_str(),
            invoked = self.handlers.len(),
            failed = failures.len(),
            "dispatch complete"
        );

        DispatchReport {
            action: self.event.name().clone(),
            category: self.event.category().clone(),
            invoked: self.handlers.len(),
            failures,
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("event", &self.event)
            .field(
                "subscriptions",
                &self.handlers.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .map_or_else(
            || String::from("handler panicked"),
            |message| format!("handler panicked: {message}"),
        )
}

/// A handler invocation that did not complete successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    subscription: SubscriptionId,
    message: String,
}

impl HandlerFailure {
    /// Returns the subscription whose handler failed.
    #[must_use]
    pub const fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Returns the failure message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Summary of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    action: ActionName,
    category: CategoryName,
    invoked: usize,
    failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// Returns the dispatched action.
    #[must_use]
    pub const fn action(&self) -> &ActionName {
        &self.action
    }

    /// Returns the category the action was routed through.
    #[must_use]
    pub const fn category(&self) -> &CategoryName {
        &self.category
    }

    /// Returns how many handlers were invoked, failed ones included.
    #[must_use]
    pub const fn invoked(&self) -> usize {
        self.invoked
    }

    /// Returns the failed invocations in the order they happened.
    #[must_use]
    pub const fn failures(&self) -> &[HandlerFailure] {
        self.failures.as_slice()
    }

    /// Returns `true` when every handler succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of posting an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The action has no assigned category; nothing ran.
    Unrecognized {
        /// The reference the caller posted.
        action: ActionRef,
    },
    /// The category exists but nobody is subscribed to it; nothing ran.
    NoSubscribers {
        /// The posted action.
        action: ActionName,
        /// Its current category.
        category: CategoryName,
    },
    /// Every subscriber of the category was invoked.
    Delivered(DispatchReport),
}

impl PostOutcome {
    /// Returns `true` when at least one handler was invoked.
    #[must_use]
    pub const fn was_handled(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// Returns the dispatch report for delivered posts.
    #[must_use]
    pub const fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Delivered(report) => Some(report),
            _ => None,
        }
    }
}

/// What [`ActionRegistry::prepare`](super::ActionRegistry::prepare) produced.
#[derive(Debug)]
pub enum Prepared {
    /// The action routes to at least one handler.
    Ready(Dispatch),
    /// The post was dropped before any handler ran.
    Dropped(PostOutcome),
}

impl Prepared {
    /// Runs the dispatch, if any, and returns the post outcome.
    #[must_use]
    pub fn run(self) -> PostOutcome {
        match self {
            Self::Ready(dispatch) => PostOutcome::Delivered(dispatch.run()),
            Self::Dropped(outcome) => outcome,
        }
    }
}
