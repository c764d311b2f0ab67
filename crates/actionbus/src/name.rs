//! Validated identifiers for actions and categories.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, NameKind};

fn validate(kind: NameKind, value: String) -> Result<String, ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::InvalidName { kind, value });
    }
    Ok(value)
}

/// Name of a distinct action kind.
///
/// # Example
///
/// ```
/// use actionbus::ActionName;
///
/// let name = ActionName::new("ExampleAction").expect("valid name");
/// assert_eq!(name.as_str(), "ExampleAction");
/// assert!(ActionName::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionName(String);

impl ActionName {
    /// Validates and wraps an action name.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] when the name is empty or only
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ActionError> {
        validate(NameKind::Action, value.into()).map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Label grouping actions and the handlers subscribed to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Validates and wraps a category name.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidName`] when the name is empty or only
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ActionError> {
        validate(NameKind::Category, value.into()).map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

macro_rules! impl_name_traits {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ActionError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ActionError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

impl_name_traits!(ActionName);
impl_name_traits!(CategoryName);
