//! Event service: the write path feeding the timeline.

use std::sync::Arc;

use super::PhotoIndex;
use crate::domain::{
    ChildId, EventId, EventPayload, EventRecord, ItemKey, NewEvent, Sleep, TimelineEntry,
    normalize,
};
use crate::error::GatewayError;
use crate::persistence::{EventStore, PhotoAttachment};

/// Logs, edits and removes events and their photo attachments.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    photos: PhotoIndex,
}

/// Validates a payload and fills in derived fields.
///
/// Instants are cut to microseconds first, so both stores order on exactly
/// the values they return. Sleep sessions with both ends known get their
/// duration in whole minutes, rounded half up.
fn prepare(payload: EventPayload) -> Result<EventPayload, GatewayError> {
    match payload.at_storage_precision() {
        EventPayload::Sleep(sleep) => prepare_sleep(sleep).map(EventPayload::Sleep),
        EventPayload::Nursing(ref nursing) if nursing.duration_minutes < 0 => Err(
            GatewayError::InvalidRequest("nursing duration must not be negative".to_string()),
        ),
        other => Ok(other),
    }
}

fn prepare_sleep(mut sleep: Sleep) -> Result<Sleep, GatewayError> {
    let Some(end) = sleep.end_time else {
        return Ok(sleep);
    };
    if end < sleep.start_time {
        return Err(GatewayError::InvalidRequest(format!(
            "sleep ends at {end} before it starts at {}",
            sleep.start_time
        )));
    }
    let seconds = (end - sleep.start_time).num_seconds();
    let minutes = seconds.saturating_add(30) / 60;
    sleep.duration_minutes = Some(i32::try_from(minutes).map_err(|_| {
        GatewayError::InvalidRequest("sleep duration is out of range".to_string())
    })?);
    Ok(sleep)
}

impl EventService {
    /// Creates a service writing to `store` and attaching through `photos`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, photos: PhotoIndex) -> Self {
        Self { store, photos }
    }

    /// Logs a new event for `child_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the payload is
    /// inconsistent, or [`GatewayError::Store`] on storage failure.
    pub async fn log_event(
        &self,
        child_id: ChildId,
        recorded_by: Option<uuid::Uuid>,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<EventRecord, GatewayError> {
        let payload = prepare(payload)?;
        let record = self
            .store
            .insert(NewEvent {
                id: EventId::new(),
                child_id,
                recorded_by,
                notes,
                payload,
            })
            .await?;

        tracing::info!(
            event_id = %record.id,
            category = %record.category(),
            %child_id,
            "event logged"
        );
        Ok(record)
    }

    /// Returns the event under `key`, decorated with its photos.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no such event exists, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn get_event(&self, key: ItemKey) -> Result<TimelineEntry, GatewayError> {
        let record = self
            .store
            .get(key)
            .await?
            .ok_or(GatewayError::EventNotFound(key))?;
        Ok(self.photos.decorate(normalize(record)).await?)
    }

    /// Replaces every attribute of the event under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `payload` belongs to a
    /// different category than `key`, [`GatewayError::EventNotFound`] if
    /// the event does not exist, or [`GatewayError::Store`] on storage
    /// failure.
    pub async fn update_event(
        &self,
        key: ItemKey,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<EventRecord, GatewayError> {
        if payload.category() != key.category {
            return Err(GatewayError::InvalidRequest(format!(
                "payload category {} does not match {}",
                payload.category(),
                key.category
            )));
        }
        let payload = prepare(payload)?;
        let record = self
            .store
            .update(key, payload, notes)
            .await?
            .ok_or(GatewayError::EventNotFound(key))?;

        tracing::info!(event_id = %key.id, category = %key.category, "event updated");
        Ok(record)
    }

    /// Deletes the event under `key` together with its photo attachments.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no such event exists, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn delete_event(&self, key: ItemKey) -> Result<(), GatewayError> {
        if !self.store.delete(key).await? {
            return Err(GatewayError::EventNotFound(key));
        }
        tracing::info!(event_id = %key.id, category = %key.category, "event deleted");
        Ok(())
    }

    /// Attaches photo URLs to an existing event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `urls` is empty,
    /// [`GatewayError::EventNotFound`] if the event does not exist, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn attach_photos(
        &self,
        key: ItemKey,
        urls: Vec<String>,
    ) -> Result<Vec<PhotoAttachment>, GatewayError> {
        if urls.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "at least one photo URL is required".to_string(),
            ));
        }
        if self.store.get(key).await?.is_none() {
            return Err(GatewayError::EventNotFound(key));
        }
        let stored = self.photos.attach(key, urls).await?;

        tracing::info!(
            event_id = %key.id,
            category = %key.category,
            count = stored.len(),
            "photos attached"
        );
        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::{
        Category, Feeding, FeedingKind, Nursing, NursingSide, PageRequest, Window,
    };
    use crate::persistence::{MemoryStore, PhotoStore};
    use crate::service::fixtures::{minutes_ago, payload_for, sources};
    use crate::service::{MergeStrategy, PaginationStrategy, PushdownStrategy};

    fn service(store: &Arc<MemoryStore>) -> EventService {
        EventService::new(
            Arc::clone(store) as Arc<dyn EventStore>,
            PhotoIndex::new(Arc::clone(store) as Arc<dyn PhotoStore>),
        )
    }

    fn sleep(start_minutes_ago: i64, end_minutes_ago: Option<i64>) -> EventPayload {
        EventPayload::Sleep(Sleep {
            start_time: minutes_ago(start_minutes_ago),
            end_time: end_minutes_ago.map(minutes_ago),
            duration_minutes: None,
            quality: Some("good".to_string()),
            location: None,
        })
    }

    #[tokio::test]
    async fn log_event_stores_and_returns_record() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let child = ChildId::new();
        let user = uuid::Uuid::new_v4();

        let Ok(record) = svc
            .log_event(
                child,
                Some(user),
                payload_for(Category::Photo, minutes_ago(3)),
                Some("park".to_string()),
            )
            .await
        else {
            panic!("log failed");
        };
        assert_eq!(record.child_id, child);
        assert_eq!(record.recorded_by, Some(user));
        assert_eq!(record.notes.as_deref(), Some("park"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sleep_duration_is_derived_and_rounded() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let mut payload = sleep(90, None);
        if let EventPayload::Sleep(s) = &mut payload {
            s.end_time = Some(s.start_time + Duration::minutes(44) + Duration::seconds(30));
        }

        let Ok(record) = svc.log_event(ChildId::new(), None, payload, None).await else {
            panic!("log failed");
        };
        assert_eq!(record.payload.duration_minutes(), Some(45));

        let Ok(open) = svc.log_event(ChildId::new(), None, sleep(30, None), None).await else {
            panic!("log failed");
        };
        assert_eq!(open.payload.duration_minutes(), None);
    }

    #[tokio::test]
    async fn inverted_sleep_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let result = service(&store)
            .log_event(ChildId::new(), None, sleep(10, Some(20)), None)
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn negative_nursing_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let payload = EventPayload::Nursing(Nursing {
            duration_minutes: -5,
            side: NursingSide::Right,
            timestamp: minutes_ago(1),
        });
        let result = service(&store)
            .log_event(ChildId::new(), None, payload, None)
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn sub_microsecond_instants_order_the_same_in_both_modes() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let child = ChildId::new();
        let at = minutes_ago(60);
        let mut logged = Vec::new();
        for nanos in [100, 900] {
            let payload = EventPayload::Feeding(Feeding {
                kind: FeedingKind::Bottle,
                amount_ml: Some(90),
                food_type: None,
                food_details: None,
                consistency: None,
                reaction: None,
                timestamp: at + Duration::nanoseconds(nanos),
            });
            let Ok(record) = svc.log_event(child, None, payload, None).await else {
                panic!("log failed");
            };
            assert_eq!(record.occurred_at(), at);
            logged.push(record.id);
        }

        let sources = sources(&store);
        let page = PageRequest::new(1, 10);
        let window = Window::unbounded();
        let Ok(merged) = MergeStrategy::all()
            .paginate(&sources, child, window, page)
            .await
        else {
            panic!("merge failed");
        };
        let Ok(pushed) = PushdownStrategy::new(Category::Feeding)
            .paginate(&sources, child, window, page)
            .await
        else {
            panic!("pushdown failed");
        };
        let merged_ids: Vec<EventId> = merged.items.iter().map(|e| e.id).collect();
        let pushed_ids: Vec<EventId> = pushed.items.iter().map(|e| e.id).collect();
        assert_eq!(merged_ids, logged);
        assert_eq!(pushed_ids, logged);
    }

    #[tokio::test]
    async fn update_requires_matching_category() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let Ok(record) = svc
            .log_event(ChildId::new(), None, payload_for(Category::Feeding, minutes_ago(5)), None)
            .await
        else {
            panic!("log failed");
        };

        let wrong = svc
            .update_event(record.key(), payload_for(Category::Diaper, minutes_ago(5)), None)
            .await;
        assert!(matches!(wrong, Err(GatewayError::InvalidRequest(_))));

        let solid = EventPayload::Feeding(Feeding {
            kind: FeedingKind::Solid,
            amount_ml: None,
            food_type: Some("fruit".to_string()),
            food_details: Some("banana".to_string()),
            consistency: Some("mashed".to_string()),
            reaction: Some("liked".to_string()),
            timestamp: minutes_ago(4),
        });
        let Ok(updated) = svc
            .update_event(record.key(), solid.clone(), Some("first banana".to_string()))
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(updated.payload, solid);
        assert_eq!(updated.seq, record.seq);
    }

    #[tokio::test]
    async fn missing_events_are_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let key = ItemKey::new(Category::Medication, EventId::new());

        assert!(matches!(svc.get_event(key).await, Err(GatewayError::EventNotFound(_))));
        assert!(matches!(svc.delete_event(key).await, Err(GatewayError::EventNotFound(_))));
        assert!(matches!(
            svc.update_event(key, payload_for(Category::Medication, minutes_ago(1)), None)
                .await,
            Err(GatewayError::EventNotFound(_))
        ));
        assert!(matches!(
            svc.attach_photos(key, vec!["/x.jpg".to_string()]).await,
            Err(GatewayError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn attach_get_delete_round() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let Ok(record) = svc
            .log_event(ChildId::new(), None, payload_for(Category::Milestone, minutes_ago(9)), None)
            .await
        else {
            panic!("log failed");
        };
        let key = record.key();

        assert!(matches!(
            svc.attach_photos(key, Vec::new()).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        let Ok(stored) = svc
            .attach_photos(key, vec!["/a.jpg".to_string(), "/b.jpg".to_string()])
            .await
        else {
            panic!("attach failed");
        };
        assert_eq!(stored.len(), 2);

        let Ok(entry) = svc.get_event(key).await else {
            panic!("get failed");
        };
        assert_eq!(entry.photo_urls.len(), 2);

        assert!(svc.delete_event(key).await.is_ok());
        let Ok(left) = store.find_by_item(key.id, Category::Milestone.as_str()).await else {
            panic!("lookup failed");
        };
        assert!(left.is_empty());
    }
}
