//! Database models for photo attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::EventId;

/// A stored row from the `item_photo` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAttachment {
    /// Attachment identifier.
    pub id: Uuid,
    /// Event the photo belongs to.
    pub item_id: EventId,
    /// Category name of that event, as written.
    pub item_type: String,
    /// Location of the stored image.
    pub photo_url: String,
    /// When the attachment was written.
    pub timestamp: DateTime<Utc>,
}

/// Attachment to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhotoAttachment {
    /// Event the photo belongs to.
    pub item_id: EventId,
    /// Category name of that event.
    pub item_type: String,
    /// Location of the stored image.
    pub photo_url: String,
    /// Attachment time; the store uses "now" when `None`.
    pub timestamp: Option<DateTime<Utc>>,
}
