//! Posted action events and the references used to post them.

use std::fmt;

use time::OffsetDateTime;

use crate::name::{ActionName, CategoryName};
use crate::resolver::ActionId;
use crate::value::Value;

/// How a caller refers to the action it posts.
///
/// Names are resolved through the registry's resolver; ids are used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRef {
    /// The human-readable action name.
    Name(String),
    /// An id previously obtained from the resolver.
    Id(ActionId),
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for ActionRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for ActionRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<&ActionName> for ActionRef {
    fn from(value: &ActionName) -> Self {
        Self::Name(value.as_str().to_owned())
    }
}

impl From<ActionId> for ActionRef {
    fn from(value: ActionId) -> Self {
        Self::Id(value)
    }
}

/// An action delivered to handlers.
///
/// Every handler in a dispatch receives the same event: the original action
/// name (even when the poster used an id), the category it was routed
/// through, and the full payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    id: ActionId,
    name: ActionName,
    category: CategoryName,
    data: Vec<Value>,
    created_at: OffsetDateTime,
}

impl ActionEvent {
    /// Creates an event stamped with the current UTC time.
    #[must_use]
    pub fn new(id: ActionId, name: ActionName, category: CategoryName, data: Vec<Value>) -> Self {
        Self {
            id,
            name,
            category,
            data,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns the resolved action id.
    #[must_use]
    pub const fn id(&self) -> ActionId {
        self.id
    }

    /// Returns the action name.
    #[must_use]
    pub const fn name(&self) -> &ActionName {
        &self.name
    }

    /// Returns the category the action was routed through.
    #[must_use]
    pub const fn category(&self) -> &CategoryName {
        &self.category
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &[Value] {
        self.data.as_slice()
    }

    /// Returns the payload item at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    /// Returns the number of payload items.
    #[must_use]
    pub const fn data_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the time the event was created.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}
