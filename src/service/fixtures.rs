//! Shared test helpers for the service layer.

#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{CategoryFetcher, PhotoIndex, TimelineSources};
use crate::domain::{
    Category, ChildId, DiaperChange, DiaperKind, EventId, EventPayload, EventRecord, Feeding,
    FeedingKind, ItemKey, Measurement, Medication, Milestone, NewEvent, Nursing, NursingSide,
    Photo, Sleep,
};
use crate::persistence::{
    EventFilter, EventQuery, EventStore, MemoryStore, PhotoStore, StoreError,
};

/// Fixed reference instant all fixtures are relative to.
pub(crate) fn base() -> DateTime<Utc> {
    let Some(t) = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single() else {
        panic!("valid timestamp");
    };
    t
}

pub(crate) fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    base() - Duration::minutes(minutes)
}

/// Smallest valid payload of `category` happening at `at`.
pub(crate) fn payload_for(category: Category, at: DateTime<Utc>) -> EventPayload {
    match category {
        Category::Diaper => EventPayload::Diaper(DiaperChange {
            kind: DiaperKind::Wet,
            timestamp: at,
        }),
        Category::Feeding => EventPayload::Feeding(Feeding {
            kind: FeedingKind::Bottle,
            amount_ml: Some(90),
            food_type: None,
            food_details: None,
            consistency: None,
            reaction: None,
            timestamp: at,
        }),
        Category::Nursing => EventPayload::Nursing(Nursing {
            duration_minutes: 12,
            side: NursingSide::Left,
            timestamp: at,
        }),
        Category::Sleep => EventPayload::Sleep(Sleep {
            start_time: at,
            end_time: Some(at + Duration::minutes(45)),
            duration_minutes: Some(45),
            quality: None,
            location: None,
        }),
        Category::Medication => EventPayload::Medication(Medication {
            name: "Vitamin D".to_string(),
            dosage: "1".to_string(),
            unit: "drops".to_string(),
            reason: None,
            administered_at: at,
        }),
        Category::Milestone => EventPayload::Milestone(Milestone {
            area: "motor".to_string(),
            title: "Rolled over".to_string(),
            description: None,
            achieved_at: at,
            photo_url: None,
        }),
        Category::Measurement => EventPayload::Measurement(Measurement {
            height_cm: None,
            weight_kg: Some(5.4),
            head_circumference_cm: None,
            temperature_c: None,
            teeth_count: None,
            measurement_type: "routine".to_string(),
            measurement_location: "home".to_string(),
            timestamp: at,
        }),
        Category::Photo => EventPayload::Photo(Photo {
            photo_url: "/uploads/photo.jpg".to_string(),
            timestamp: at,
        }),
    }
}

pub(crate) async fn seed(
    store: &MemoryStore,
    child_id: ChildId,
    category: Category,
    at: DateTime<Utc>,
) -> EventRecord {
    let event = NewEvent {
        id: EventId::new(),
        child_id,
        recorded_by: None,
        notes: None,
        payload: payload_for(category, at),
    };
    let Ok(record) = store.insert(event).await else {
        panic!("seed insert failed");
    };
    record
}

/// Seeds `count` events spread over every category and the last dozen
/// minutes, with plenty of instants shared within and across categories.
pub(crate) async fn seed_mixed(store: &MemoryStore, child_id: ChildId, count: usize) {
    for (i, category) in Category::ALL.into_iter().cycle().take(count).enumerate() {
        let minutes = i64::try_from(i * 7 % 13).unwrap_or(0);
        seed(store, child_id, category, minutes_ago(minutes)).await;
    }
}

pub(crate) fn sources(store: &Arc<MemoryStore>) -> TimelineSources {
    TimelineSources {
        fetcher: CategoryFetcher::new(Arc::clone(store) as Arc<dyn EventStore>),
        photos: PhotoIndex::new(Arc::clone(store) as Arc<dyn PhotoStore>),
    }
}

/// Event store whose reads of one category always fail.
#[derive(Debug)]
pub(crate) struct FailingStore {
    inner: Arc<MemoryStore>,
    broken: Category,
}

impl FailingStore {
    pub(crate) fn new(inner: Arc<MemoryStore>, broken: Category) -> Self {
        Self { inner, broken }
    }

    fn check(&self, category: Category) -> Result<(), StoreError> {
        if category == self.broken {
            return Err(StoreError::Database(format!("{category} table unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for FailingStore {
    async fn find(&self, query: &EventQuery) -> Result<Vec<EventRecord>, StoreError> {
        self.check(query.filter.category)?;
        self.inner.find(query).await
    }

    async fn count(&self, filter: &EventFilter) -> Result<u64, StoreError> {
        self.check(filter.category)?;
        self.inner.count(filter).await
    }

    async fn get(&self, key: ItemKey) -> Result<Option<EventRecord>, StoreError> {
        self.inner.get(key).await
    }

    async fn insert(&self, event: NewEvent) -> Result<EventRecord, StoreError> {
        self.inner.insert(event).await
    }

    async fn update(
        &self,
        key: ItemKey,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<Option<EventRecord>, StoreError> {
        self.inner.update(key, payload, notes).await
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, StoreError> {
        self.inner.delete(key).await
    }
}
