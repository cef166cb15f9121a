//! Domain layer: children, categories, events, timeline entries and the
//! page contract.
//!
//! This module holds the pure model of the service. Nothing here touches
//! storage or HTTP; the normalizer ([`normalize`]) and the feed ordering
//! ([`timeline_order`]) are plain functions over these types.

pub mod category;
pub mod child;
pub mod event;
pub mod ids;
pub mod page;
pub mod timeline;

pub use category::{Category, CategorySelector, UnknownCategory};
pub use child::{BlankField, Child, ChildProfile, NewChild};
pub use event::{
    DiaperChange, DiaperKind, EventPayload, EventRecord, Feeding, FeedingKind, ItemKey,
    Measurement, Medication, Milestone, NewEvent, Nursing, NursingSide, Photo, Sleep,
};
pub use ids::{ChildId, EventId};
pub use page::{Page, PageRequest, PaginationMeta};
pub use timeline::{InvalidWindow, TimelineEntry, Window, normalize, timeline_order};
