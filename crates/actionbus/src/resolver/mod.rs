//! Resolution of action names to stable opaque identifiers.
//!
//! The registry never interprets an [`ActionId`]; it only uses the id as a
//! lookup key interchangeable with the name it was derived from. How ids are
//! generated belongs to the [`Resolver`] the registry was built with.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque correlation token derived from an action name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(u64);

impl ActionId {
    /// Wraps a raw id, for example one received from a host.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<u64> for ActionId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Maps a human-readable name to an [`ActionId`].
///
/// Implementations must be deterministic for the lifetime of a registry: the
/// same name must always resolve to the same id.
pub trait Resolver: Send + Sync {
    /// Resolves `name` to its identifier.
    fn resolve(&self, name: &str) -> ActionId;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> ActionId + Send + Sync,
{
    fn resolve(&self, name: &str) -> ActionId {
        self(name)
    }
}

/// Default resolver: the first eight bytes of the SHA-256 digest of the name.
///
/// Ids are stable across processes and platforms, so a host may persist them
/// or hand them to scripts and post them back later.
///
/// # Example
///
/// ```
/// use actionbus::{DigestResolver, Resolver};
///
/// let resolver = DigestResolver;
/// assert_eq!(resolver.resolve("ExampleAction"), resolver.resolve("ExampleAction"));
/// assert_ne!(resolver.resolve("ExampleAction"), resolver.resolve("ExampleAction2"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestResolver;

impl Resolver for DigestResolver {
    fn resolve(&self, name: &str) -> ActionId {
        let digest = Sha256::digest(name.as_bytes());
        let raw = digest
            .iter()
            .take(8)
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
        ActionId(raw)
    }
}
