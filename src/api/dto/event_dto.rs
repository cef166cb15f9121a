//! Event write DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, ChildId, EventId, EventPayload, EventRecord};
use crate::persistence::PhotoAttachment;

/// Request body for creating or replacing an event.
///
/// The payload's fields sit at the top level next to `notes`, tagged by
/// `category`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EventRequest {
    /// Category-tagged attributes.
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stored event as returned by writes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event identifier.
    pub id: EventId,
    /// Category table the event lives in.
    pub category: Category,
    /// Owning child.
    pub child_id: ChildId,
    /// User who logged the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<uuid::Uuid>,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Category-specific attributes.
    pub payload: EventPayload,
    /// When the event was written.
    pub created_at: DateTime<Utc>,
}

impl From<EventRecord> for EventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id,
            category: record.category(),
            child_id: record.child_id,
            recorded_by: record.recorded_by,
            notes: record.notes,
            payload: record.payload,
            created_at: record.created_at,
        }
    }
}

/// Request body for `POST /events/{category}/{id}/photos`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachPhotosRequest {
    /// Photo locations to attach, in order.
    pub photo_urls: Vec<String>,
}

/// Response body for `POST /events/{category}/{id}/photos`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttachPhotosResponse {
    /// Attachments written.
    pub photos: Vec<PhotoAttachment>,
}
