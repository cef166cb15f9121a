//! Persistence layer: children, category stores and the photo attachment
//! store.
//!
//! Storage is reached only through the [`ChildStore`], [`EventStore`] and
//! [`PhotoStore`] traits: child CRUD, predicate-based `find`/`count` per
//! category, and lookups of photo attachments by `(item id, item type)`.
//! Two implementations exist:
//! [`MemoryStore`] for tests and development, and [`PostgresStore`] backed
//! by `sqlx::PgPool` with one table per category.

pub mod memory;
pub mod models;
pub mod postgres;

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Category, Child, ChildId, ChildProfile, EventId, EventPayload, EventRecord, ItemKey,
    NewChild, NewEvent, Window,
};

pub use memory::MemoryStore;
pub use models::{NewPhotoAttachment, PhotoAttachment};
pub use postgres::PostgresStore;

/// Storage failure. Never retried by the layers above.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing database failed or is unreachable.
    #[error("database error: {0}")]
    Database(String),

    /// An event payload could not be encoded for, or decoded from, a row.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Predicate shared by `find` and `count` on one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    /// Owning child.
    pub child_id: ChildId,
    /// Category table to read.
    pub category: Category,
    /// Inclusive bounds on the category's instant field.
    pub window: Window,
}

/// A `find` request: the filter plus optional limit/offset.
///
/// Results are always ordered newest first by the category's instant,
/// with ties broken by insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    /// Which rows match.
    pub filter: EventFilter,
    /// Maximum number of rows, or every matching row when `None`.
    pub limit: Option<u64>,
    /// Rows to skip before the first returned one.
    pub offset: u64,
}

impl EventQuery {
    /// Every row matching `filter`.
    #[must_use]
    pub const fn unbounded(filter: EventFilter) -> Self {
        Self {
            filter,
            limit: None,
            offset: 0,
        }
    }

    /// At most `limit` rows matching `filter`, after skipping `offset`.
    #[must_use]
    pub const fn paged(filter: EventFilter, limit: u64, offset: u64) -> Self {
        Self {
            filter,
            limit: Some(limit),
            offset,
        }
    }
}

/// Per-category event storage.
#[async_trait]
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Returns matching rows ordered newest first, ties by insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn find(&self, query: &EventQuery) -> Result<Vec<EventRecord>, StoreError>;

    /// Counts rows matching `filter`, independent of any limit.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn count(&self, filter: &EventFilter) -> Result<u64, StoreError>;

    /// Fetches a single event.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn get(&self, key: ItemKey) -> Result<Option<EventRecord>, StoreError>;

    /// Inserts an event, assigning its insertion sequence.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn insert(&self, event: NewEvent) -> Result<EventRecord, StoreError>;

    /// Replaces the payload and notes of an existing event.
    ///
    /// Returns `None` if no event exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn update(
        &self,
        key: ItemKey,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<Option<EventRecord>, StoreError>;

    /// Deletes an event together with its photo attachments, atomically.
    ///
    /// Returns `false` if no event exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure; nothing is deleted then.
    async fn delete(&self, key: ItemKey) -> Result<bool, StoreError>;
}

/// Child storage.
#[async_trait]
pub trait ChildStore: Send + Sync + fmt::Debug {
    /// Returns children oldest record first, restricted to `owner` when
    /// given.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn list_children(&self, owner: Option<uuid::Uuid>) -> Result<Vec<Child>, StoreError>;

    /// Fetches a single child.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StoreError>;

    /// Stores a new child.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn insert_child(&self, child: NewChild) -> Result<Child, StoreError>;

    /// Replaces the editable fields of a child.
    ///
    /// Returns `None` if no child exists under `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn update_child(
        &self,
        id: ChildId,
        profile: ChildProfile,
    ) -> Result<Option<Child>, StoreError>;

    /// Deletes a child with every event it owns and those events' photo
    /// attachments, atomically.
    ///
    /// Returns `false` if no child exists under `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure; nothing is deleted then.
    async fn delete_child(&self, id: ChildId) -> Result<bool, StoreError>;
}

/// Polymorphic photo attachment storage.
///
/// Attachments are keyed by a raw `(item_id, item_type)` pair with no
/// referential integrity. A lookup with a different spelling of the type
/// simply finds nothing.
#[async_trait]
pub trait PhotoStore: Send + Sync + fmt::Debug {
    /// Returns attachments for the pair, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn find_by_item(
        &self,
        item_id: EventId,
        item_type: &str,
    ) -> Result<Vec<PhotoAttachment>, StoreError>;

    /// Stores one attachment.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    async fn insert_photo(
        &self,
        photo: NewPhotoAttachment,
    ) -> Result<PhotoAttachment, StoreError>;
}

/// Order every store returns rows in: instant descending, then insertion
/// sequence ascending.
pub(crate) fn store_order(a: &EventRecord, b: &EventRecord) -> Ordering {
    b.occurred_at()
        .cmp(&a.occurred_at())
        .then_with(|| a.seq.cmp(&b.seq))
}
