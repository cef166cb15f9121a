//! Logged events: one payload variant per category.
//!
//! Every category stores its instant under its own field name
//! (`timestamp`, `startTime`, `administeredAt`, `achievedAt`). The
//! [`EventPayload::occurred_at`] accessor is an exhaustive match over the
//! variants, so adding a category without mapping its instant does not
//! compile.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Category, ChildId, EventId};

/// Contents of a diaper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiaperKind {
    /// Wet only.
    Wet,
    /// Dirty only.
    Dirty,
    /// Wet and dirty.
    #[default]
    Both,
}

/// How a feeding was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedingKind {
    /// Bottle feeding.
    #[default]
    Bottle,
    /// Breast feeding logged as a feeding rather than a nursing session.
    Nursing,
    /// Solid food.
    Solid,
}

/// Which side a nursing session used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NursingSide {
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// Both sides.
    Both,
}

/// A diaper change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaperChange {
    /// Wet, dirty or both. Defaults to both.
    #[serde(default)]
    pub kind: DiaperKind,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}

/// A feeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feeding {
    /// Bottle, nursing or solid. Defaults to bottle.
    #[serde(default)]
    pub kind: FeedingKind,
    /// Amount in ml for bottle feedings.
    #[serde(default)]
    pub amount_ml: Option<i32>,
    /// Food group for solids (fruit, vegetable, grain, ...).
    #[serde(default)]
    pub food_type: Option<String>,
    /// Specific food item.
    #[serde(default)]
    pub food_details: Option<String>,
    /// Puree, mashed, small pieces, ...
    #[serde(default)]
    pub consistency: Option<String>,
    /// Liked, disliked, allergic, ...
    #[serde(default)]
    pub reaction: Option<String>,
    /// When the feeding happened.
    pub timestamp: DateTime<Utc>,
}

/// A nursing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Nursing {
    /// Length of the session in minutes.
    pub duration_minutes: i32,
    /// Side used.
    pub side: NursingSide,
    /// When the session happened.
    pub timestamp: DateTime<Utc>,
}

/// A sleep session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sleep {
    /// When the child fell asleep.
    pub start_time: DateTime<Utc>,
    /// When the child woke up, if already known.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Length in minutes, derived from start and end when both are known.
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    /// Good, fair, poor.
    #[serde(default)]
    pub quality: Option<String>,
    /// Crib, bed, stroller, car seat, ...
    #[serde(default)]
    pub location: Option<String>,
}

/// An administered medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Medication name.
    pub name: String,
    /// Dosage amount as entered.
    pub dosage: String,
    /// Dosage unit (ml, mg, drops, ...).
    pub unit: String,
    /// Why it was given.
    #[serde(default)]
    pub reason: Option<String>,
    /// When it was given.
    pub administered_at: DateTime<Utc>,
}

/// A developmental milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Motor, cognitive, social, language.
    pub area: String,
    /// Short title, e.g. "First smile".
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the milestone was reached.
    pub achieved_at: DateTime<Utc>,
    /// Cover photo chosen at creation time.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A growth or health measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Height in cm.
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// Weight in kg.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Head circumference in cm.
    #[serde(default)]
    pub head_circumference_cm: Option<f64>,
    /// Body temperature in Celsius.
    #[serde(default)]
    pub temperature_c: Option<f64>,
    /// Number of teeth.
    #[serde(default)]
    pub teeth_count: Option<i32>,
    /// Routine, sick, doctor. Defaults to routine.
    #[serde(default = "default_measurement_type")]
    pub measurement_type: String,
    /// Home, doctor, hospital. Defaults to home.
    #[serde(default = "default_measurement_location")]
    pub measurement_location: String,
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
}

fn default_measurement_type() -> String {
    "routine".to_string()
}

fn default_measurement_location() -> String {
    "home".to_string()
}

/// A standalone photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Location of the stored image.
    pub photo_url: String,
    /// When the photo was taken.
    pub timestamp: DateTime<Utc>,
}

/// Category-specific attributes of an event, tagged by category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum EventPayload {
    /// Diaper change.
    Diaper(DiaperChange),
    /// Feeding.
    Feeding(Feeding),
    /// Nursing session.
    Nursing(Nursing),
    /// Sleep session.
    Sleep(Sleep),
    /// Medication.
    Medication(Medication),
    /// Milestone.
    Milestone(Milestone),
    /// Measurement.
    Measurement(Measurement),
    /// Photo.
    Photo(Photo),
}

impl EventPayload {
    /// Category this payload belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Diaper(_) => Category::Diaper,
            Self::Feeding(_) => Category::Feeding,
            Self::Nursing(_) => Category::Nursing,
            Self::Sleep(_) => Category::Sleep,
            Self::Medication(_) => Category::Medication,
            Self::Milestone(_) => Category::Milestone,
            Self::Measurement(_) => Category::Measurement,
            Self::Photo(_) => Category::Photo,
        }
    }

    /// The category-specific instant, normalized as "when it happened".
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Diaper(v) => v.timestamp,
            Self::Feeding(v) => v.timestamp,
            Self::Nursing(v) => v.timestamp,
            Self::Sleep(v) => v.start_time,
            Self::Medication(v) => v.administered_at,
            Self::Milestone(v) => v.achieved_at,
            Self::Measurement(v) => v.timestamp,
            Self::Photo(v) => v.timestamp,
        }
    }

    /// Drops sub-microsecond precision from every instant in the payload.
    ///
    /// `TIMESTAMPTZ` keeps microseconds, so an instant column and the
    /// `details` copy of the same instant only agree once both are cut to
    /// that precision.
    #[must_use]
    pub fn at_storage_precision(mut self) -> Self {
        fn micros(at: &mut DateTime<Utc>) {
            *at = at.trunc_subsecs(6);
        }
        match &mut self {
            Self::Diaper(v) => micros(&mut v.timestamp),
            Self::Feeding(v) => micros(&mut v.timestamp),
            Self::Nursing(v) => micros(&mut v.timestamp),
            Self::Sleep(v) => {
                micros(&mut v.start_time);
                if let Some(end) = v.end_time.as_mut() {
                    micros(end);
                }
            }
            Self::Medication(v) => micros(&mut v.administered_at),
            Self::Milestone(v) => micros(&mut v.achieved_at),
            Self::Measurement(v) => micros(&mut v.timestamp),
            Self::Photo(v) => micros(&mut v.timestamp),
        }
        self
    }

    /// Minutes this event lasted, for categories that track a duration.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i32> {
        match self {
            Self::Nursing(v) => Some(v.duration_minutes),
            Self::Sleep(v) => v.duration_minutes,
            Self::Diaper(_)
            | Self::Feeding(_)
            | Self::Medication(_)
            | Self::Milestone(_)
            | Self::Measurement(_)
            | Self::Photo(_) => None,
        }
    }

    /// Serializes the variant's attributes without the category tag, as
    /// stored in a category table's `details` column.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the attributes cannot be encoded.
    pub fn to_details(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Diaper(v) => serde_json::to_value(v),
            Self::Feeding(v) => serde_json::to_value(v),
            Self::Nursing(v) => serde_json::to_value(v),
            Self::Sleep(v) => serde_json::to_value(v),
            Self::Medication(v) => serde_json::to_value(v),
            Self::Milestone(v) => serde_json::to_value(v),
            Self::Measurement(v) => serde_json::to_value(v),
            Self::Photo(v) => serde_json::to_value(v),
        }
    }

    /// Rebuilds a payload from a category and its stored attributes.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `details` does not match the
    /// attribute shape of `category`.
    pub fn from_details(
        category: Category,
        details: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match category {
            Category::Diaper => Self::Diaper(serde_json::from_value(details)?),
            Category::Feeding => Self::Feeding(serde_json::from_value(details)?),
            Category::Nursing => Self::Nursing(serde_json::from_value(details)?),
            Category::Sleep => Self::Sleep(serde_json::from_value(details)?),
            Category::Medication => Self::Medication(serde_json::from_value(details)?),
            Category::Milestone => Self::Milestone(serde_json::from_value(details)?),
            Category::Measurement => Self::Measurement(serde_json::from_value(details)?),
            Category::Photo => Self::Photo(serde_json::from_value(details)?),
        })
    }
}

/// Locates one event: the category picks the table, the id the row.
///
/// This is also the key photo attachments hang off. Because the category
/// half is a [`Category`] rather than free text, writers and readers always
/// agree on its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Category table of the event.
    pub category: Category,
    /// Event identifier.
    pub id: EventId,
}

impl ItemKey {
    /// Creates a key for the given category and id.
    #[must_use]
    pub const fn new(category: Category, id: EventId) -> Self {
        Self { category, id }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}

/// A new event as submitted by a caller, before the store has assigned
/// its insertion sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Pre-generated identifier.
    pub id: EventId,
    /// Owning child.
    pub child_id: ChildId,
    /// User who logged the event, when known.
    pub recorded_by: Option<uuid::Uuid>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Category-specific attributes.
    pub payload: EventPayload,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Event identifier.
    pub id: EventId,
    /// Owning child.
    pub child_id: ChildId,
    /// Insertion sequence assigned by the store; breaks ties between
    /// events of the same category that share an instant.
    pub seq: i64,
    /// User who logged the event, when known.
    pub recorded_by: Option<uuid::Uuid>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Category-specific attributes.
    pub payload: EventPayload,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Category of the event.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.payload.category()
    }

    /// Normalized instant of the event.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.payload.occurred_at()
    }

    /// Key locating this event and its photo attachments.
    #[must_use]
    pub const fn key(&self) -> ItemKey {
        ItemKey::new(self.category(), self.id)
    }
}
