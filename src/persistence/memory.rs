//! In-memory implementation of the persistence layer.
//!
//! All state sits behind a single [`tokio::sync::RwLock`]. Reads share the
//! lock; every write, including the cascading deletes, happens inside one
//! write guard and is therefore atomic with respect to readers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewPhotoAttachment, PhotoAttachment};
use super::{
    ChildStore, EventFilter, EventQuery, EventStore, PhotoStore, StoreError, store_order,
};
use crate::domain::{
    Category, Child, ChildId, ChildProfile, EventId, EventPayload, EventRecord, ItemKey,
    NewChild, NewEvent,
};

/// Event and photo storage held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_seq: i64,
    children: Vec<Child>,
    events: HashMap<Category, Vec<EventRecord>>,
    photos: Vec<(i64, PhotoAttachment)>,
}

impl MemoryState {
    fn drop_photos_of(&mut self, item_id: EventId, category: Category) {
        let item_type = category.as_str();
        self.photos
            .retain(|(_, p)| !(p.item_id == item_id && p.item_type == item_type));
    }

    fn bump_seq(&mut self) -> i64 {
        self.next_seq = self.next_seq.saturating_add(1);
        self.next_seq
    }

    fn matching<'a>(
        &'a self,
        filter: &'a EventFilter,
    ) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.events
            .get(&filter.category)
            .into_iter()
            .flatten()
            .filter(move |r| {
                r.child_id == filter.child_id && filter.window.contains(r.occurred_at())
            })
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored events across all categories.
    pub async fn len(&self) -> usize {
        self.state.read().await.events.values().map(Vec::len).sum()
    }

    /// Returns `true` if no events are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find(&self, query: &EventQuery) -> Result<Vec<EventRecord>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<EventRecord> = state.matching(&query.filter).cloned().collect();
        rows.sort_by(store_order);
        Ok(rows
            .into_iter()
            .skip(to_usize(query.offset))
            .take(query.limit.map_or(usize::MAX, to_usize))
            .collect())
    }

    async fn count(&self, filter: &EventFilter) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.matching(filter).count() as u64)
    }

    async fn get(&self, key: ItemKey) -> Result<Option<EventRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .events
            .get(&key.category)
            .and_then(|rows| rows.iter().find(|r| r.id == key.id))
            .cloned())
    }

    async fn insert(&self, event: NewEvent) -> Result<EventRecord, StoreError> {
        let mut state = self.state.write().await;
        let category = event.payload.category();
        if state
            .events
            .get(&category)
            .is_some_and(|rows| rows.iter().any(|r| r.id == event.id))
        {
            return Err(StoreError::Database(format!(
                "event {category}/{} already exists",
                event.id
            )));
        }
        let seq = state.bump_seq();
        let record = EventRecord {
            id: event.id,
            child_id: event.child_id,
            seq,
            recorded_by: event.recorded_by,
            notes: event.notes,
            payload: event.payload,
            created_at: Utc::now(),
        };
        state
            .events
            .entry(record.category())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        key: ItemKey,
        payload: EventPayload,
        notes: Option<String>,
    ) -> Result<Option<EventRecord>, StoreError> {
        let mut state = self.state.write().await;
        let Some(record) = state
            .events
            .get_mut(&key.category)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == key.id))
        else {
            return Ok(None);
        };
        record.payload = payload;
        record.notes = notes;
        Ok(Some(record.clone()))
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(rows) = state.events.get_mut(&key.category) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| r.id != key.id);
        if rows.len() == before {
            return Ok(false);
        }
        state.drop_photos_of(key.id, key.category);
        Ok(true)
    }
}

#[async_trait]
impl ChildStore for MemoryStore {
    async fn list_children(&self, owner: Option<Uuid>) -> Result<Vec<Child>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .children
            .iter()
            .filter(|c| owner.is_none_or(|o| c.owner_id == Some(o)))
            .cloned()
            .collect())
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StoreError> {
        let state = self.state.read().await;
        Ok(state.children.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_child(&self, child: NewChild) -> Result<Child, StoreError> {
        let mut state = self.state.write().await;
        if state.children.iter().any(|c| c.id == child.id) {
            return Err(StoreError::Database(format!(
                "child {} already exists",
                child.id
            )));
        }
        let stored = Child::from_parts(child.id, child.owner_id, child.profile, Utc::now());
        state.children.push(stored.clone());
        Ok(stored)
    }

    async fn update_child(
        &self,
        id: ChildId,
        profile: ChildProfile,
    ) -> Result<Option<Child>, StoreError> {
        let mut state = self.state.write().await;
        let Some(child) = state.children.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        child.apply(profile);
        Ok(Some(child.clone()))
    }

    async fn delete_child(&self, id: ChildId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.children.len();
        state.children.retain(|c| c.id != id);
        if state.children.len() == before {
            return Ok(false);
        }
        let mut owned = Vec::new();
        for rows in state.events.values_mut() {
            rows.retain(|r| {
                if r.child_id == id {
                    owned.push(r.key());
                    false
                } else {
                    true
                }
            });
        }
        for key in owned {
            state.drop_photos_of(key.id, key.category);
        }
        Ok(true)
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn find_by_item(
        &self,
        item_id: EventId,
        item_type: &str,
    ) -> Result<Vec<PhotoAttachment>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<&(i64, PhotoAttachment)> = state
            .photos
            .iter()
            .filter(|(_, p)| p.item_id == item_id && p.item_type == item_type)
            .collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.timestamp.cmp(&a.timestamp).then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn insert_photo(
        &self,
        photo: NewPhotoAttachment,
    ) -> Result<PhotoAttachment, StoreError> {
        let mut state = self.state.write().await;
        let seq = state.bump_seq();
        let stored = PhotoAttachment {
            id: Uuid::new_v4(),
            item_id: photo.item_id,
            item_type: photo.item_type,
            photo_url: photo.photo_url,
            timestamp: photo.timestamp.unwrap_or_else(Utc::now),
        };
        state.photos.push((seq, stored.clone()));
        Ok(stored)
    }
}
