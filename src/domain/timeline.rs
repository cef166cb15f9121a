//! Normalized timeline entries and the time window they are filtered by.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Category, ChildId, EventId, EventPayload, EventRecord, ItemKey};

/// Returned when a window's end lies before its start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("window end {end} is before start {start}")]
pub struct InvalidWindow {
    /// Requested lower bound.
    pub start: DateTime<Utc>,
    /// Requested upper bound.
    pub end: DateTime<Utc>,
}

/// Optional instant range applied to each category's instant field.
///
/// Both bounds are inclusive; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Window {
    /// Creates a window from optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWindow`] if both bounds are present and `end` is
    /// before `start`.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, InvalidWindow> {
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window with no bounds at all.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Inclusive lower bound, if any.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Inclusive upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns `true` if `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start)
            && self.end.is_none_or(|end| instant <= end)
    }
}

/// One event as shown in the unified feed.
///
/// Built fresh for every query from an [`EventRecord`]; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Event identifier.
    pub id: EventId,
    /// Category the event came from.
    pub category: Category,
    /// The category-specific instant.
    pub occurred_at: DateTime<Utc>,
    /// Owning child.
    pub child_id: ChildId,
    /// User who logged the event, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<uuid::Uuid>,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// All category-specific attributes, untouched.
    pub payload: EventPayload,
    /// Attached photo URLs, newest first.
    pub photo_urls: Vec<String>,
    /// Store insertion sequence, used only for ordering.
    #[serde(skip)]
    pub seq: i64,
}

impl TimelineEntry {
    /// Key locating the underlying event.
    #[must_use]
    pub const fn key(&self) -> ItemKey {
        ItemKey::new(self.category, self.id)
    }
}

/// Maps a stored record onto the common timeline shape.
///
/// The photo list starts empty; decoration happens separately.
#[must_use]
pub fn normalize(record: EventRecord) -> TimelineEntry {
    TimelineEntry {
        id: record.id,
        category: record.category(),
        occurred_at: record.occurred_at(),
        child_id: record.child_id,
        recorded_by: record.recorded_by,
        notes: record.notes,
        payload: record.payload,
        photo_urls: Vec::new(),
        seq: record.seq,
    }
}

/// Total order of the merged feed.
///
/// Newest first. Entries sharing an instant are ordered by category
/// (declaration order of [`Category`]) and then by insertion sequence, which
/// is exactly the order each category store returns on its own.
#[must_use]
pub fn timeline_order(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
    b.occurred_at
        .cmp(&a.occurred_at)
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.seq.cmp(&b.seq))
}
