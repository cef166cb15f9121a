//! Per-category fetcher: one category's records for a child, plus the
//! number of records matching the same predicate.

use std::sync::Arc;

use crate::domain::{Category, ChildId, EventRecord, PageRequest, Window};
use crate::persistence::{EventFilter, EventQuery, EventStore, StoreError};

/// Records of one category and the total matching the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    /// Records, newest first, ties by insertion order.
    pub records: Vec<EventRecord>,
    /// Number of records matching the filter, regardless of paging.
    pub total_count: u64,
}

/// Reads one category store at a time.
#[derive(Debug, Clone)]
pub struct CategoryFetcher {
    store: Arc<dyn EventStore>,
}

impl CategoryFetcher {
    /// Creates a fetcher over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Fetches `category` records of `child_id` inside `window`.
    ///
    /// Without `page` every matching record is returned and the total is
    /// simply their number. With `page` the limit/offset is pushed to the
    /// store and the total comes from a separate count over the same
    /// predicate; both queries run concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] raised by the store.
    pub async fn fetch(
        &self,
        child_id: ChildId,
        category: Category,
        window: Window,
        page: Option<PageRequest>,
    ) -> Result<Fetched, StoreError> {
        let filter = EventFilter {
            child_id,
            category,
            window,
        };

        let result = match page {
            None => self
                .store
                .find(&EventQuery::unbounded(filter))
                .await
                .map(|records| Fetched {
                    total_count: records.len() as u64,
                    records,
                }),
            Some(page) => {
                let query = EventQuery::paged(filter, u64::from(page.limit()), page.offset());
                tokio::try_join!(self.store.find(&query), self.store.count(&filter))
                    .map(|(records, total_count)| Fetched {
                        records,
                        total_count,
                    })
            }
        };

        if let Err(e) = &result {
            tracing::warn!(%child_id, %category, error = %e, "category fetch failed");
        }
        result
    }
}
