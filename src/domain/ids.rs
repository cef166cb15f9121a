//! Type-safe identifiers for children and logged events.
//!
//! [`ChildId`] and [`EventId`] are newtype wrappers around [`uuid::Uuid`]
//! so that a child identifier can never be passed where an event
//! identifier is expected (and vice versa).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of the child that owns a set of events.
///
/// Access is authorized upstream: the gateway trusts that the caller may
/// read or write any `ChildId` it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ChildId(uuid::Uuid);

impl ChildId {
    /// Creates a new random `ChildId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ChildId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ChildId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ChildId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier of a single logged event, unique within its category.
///
/// On its own an `EventId` does not say which category table the event
/// lives in; pair it with a category through [`super::ItemKey`] whenever
/// the event has to be located. Fresh ids are random v4 UUIDs, so a clash
/// across categories does not happen in practice, but no store rejects one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EventId(uuid::Uuid);

impl EventId {
    /// Creates a new random `EventId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates an `EventId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for EventId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
