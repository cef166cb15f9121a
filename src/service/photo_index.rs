//! Photo attachment index: resolves `(event id, category)` to photo URLs.
//!
//! Reads and writes both go through [`ItemKey`], so the `item_type` string
//! is always [`crate::domain::Category::as_str`]. Attachments written under
//! any other spelling are invisible here, not an error.
//!
//! Decoration issues one lookup per entry, at most
//! [`DECORATE_CONCURRENCY`] at a time so a long feed cannot drain the
//! connection pool.

use std::sync::Arc;

use futures_util::{StreamExt, TryStreamExt, stream};

use crate::domain::{ItemKey, TimelineEntry};
use crate::persistence::{NewPhotoAttachment, PhotoAttachment, PhotoStore, StoreError};

/// Photo lookups in flight at once while decorating a page.
pub const DECORATE_CONCURRENCY: usize = 8;

/// Lookup and write access to photo attachments.
#[derive(Debug, Clone)]
pub struct PhotoIndex {
    store: Arc<dyn PhotoStore>,
}

impl PhotoIndex {
    /// Creates an index over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn PhotoStore>) -> Self {
        Self { store }
    }

    /// Photo URLs attached to `key`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    pub async fn photos_for(&self, key: ItemKey) -> Result<Vec<String>, StoreError> {
        let rows = self
            .store
            .find_by_item(key.id, key.category.as_str())
            .await?;
        Ok(rows.into_iter().map(|p| p.photo_url).collect())
    }

    /// Attaches each URL to `key`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on the first failed write; earlier
    /// attachments stay written.
    pub async fn attach(
        &self,
        key: ItemKey,
        urls: Vec<String>,
    ) -> Result<Vec<PhotoAttachment>, StoreError> {
        let mut stored = Vec::with_capacity(urls.len());
        for photo_url in urls {
            let attachment = self
                .store
                .insert_photo(NewPhotoAttachment {
                    item_id: key.id,
                    item_type: key.category.as_str().to_string(),
                    photo_url,
                    timestamp: None,
                })
                .await?;
            stored.push(attachment);
        }
        Ok(stored)
    }

    /// Fills in the photo URLs of one entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    pub async fn decorate(&self, mut entry: TimelineEntry) -> Result<TimelineEntry, StoreError> {
        entry.photo_urls = self.photos_for(entry.key()).await?;
        Ok(entry)
    }

    /// Decorates every entry, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`]; no entries are returned then.
    pub async fn decorate_all(
        &self,
        entries: Vec<TimelineEntry>,
    ) -> Result<Vec<TimelineEntry>, StoreError> {
        stream::iter(entries)
            .map(|entry| self.decorate(entry))
            .buffered(DECORATE_CONCURRENCY)
            .try_collect()
            .await
    }
}
