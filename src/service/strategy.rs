//! The two pagination strategies behind the timeline.
//!
//! [`MergeStrategy`] materializes every record of its categories, merges
//! them and slices the requested page out of memory. [`PushdownStrategy`]
//! hands limit/offset to a single category store and decorates only the
//! rows it gets back. Both return the same [`Page`] shape, and for one
//! category they return the same page.

use std::fmt;

use async_trait::async_trait;
use futures_util::future::try_join_all;

use super::{CategoryFetcher, PhotoIndex};
use crate::domain::{
    Category, CategorySelector, ChildId, Page, PageRequest, TimelineEntry, Window, normalize,
    timeline_order,
};
use crate::error::TimelineError;

/// Everything a strategy reads from.
#[derive(Debug, Clone)]
pub struct TimelineSources {
    /// Category stores.
    pub fetcher: CategoryFetcher,
    /// Photo attachments.
    pub photos: PhotoIndex,
}

/// Produces one page of timeline entries.
#[async_trait]
pub trait PaginationStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Builds the requested page for `child_id` inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Store`] if any read fails; no partial page
    /// is ever returned.
    async fn paginate(
        &self,
        sources: &TimelineSources,
        child_id: ChildId,
        window: Window,
        page: PageRequest,
    ) -> Result<Page<TimelineEntry>, TimelineError>;
}

/// Returns the strategy serving `selector`.
#[must_use]
pub fn strategy_for(selector: CategorySelector) -> Box<dyn PaginationStrategy> {
    match selector {
        CategorySelector::All => Box::new(MergeStrategy::all()),
        CategorySelector::One(category) => Box::new(PushdownStrategy::new(category)),
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Materialize-then-slice over a set of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStrategy {
    categories: Vec<Category>,
}

impl MergeStrategy {
    /// Merges every category.
    #[must_use]
    pub fn all() -> Self {
        Self::only(&Category::ALL)
    }

    /// Merges just the given categories.
    #[must_use]
    pub fn only(categories: &[Category]) -> Self {
        Self {
            categories: categories.to_vec(),
        }
    }
}

#[async_trait]
impl PaginationStrategy for MergeStrategy {
    fn name(&self) -> &'static str {
        "merge"
    }

    async fn paginate(
        &self,
        sources: &TimelineSources,
        child_id: ChildId,
        window: Window,
        page: PageRequest,
    ) -> Result<Page<TimelineEntry>, TimelineError> {
        let fetches = self.categories.iter().map(|&category| async move {
            let fetched = sources
                .fetcher
                .fetch(child_id, category, window, None)
                .await?;
            let entries = fetched.records.into_iter().map(normalize).collect();
            sources.photos.decorate_all(entries).await
        });
        let per_category = try_join_all(fetches).await?;

        let total_count: u64 = per_category.iter().map(|e| e.len() as u64).sum();
        let mut entries: Vec<TimelineEntry> = per_category.into_iter().flatten().collect();
        entries.sort_by(timeline_order);

        let items = entries
            .into_iter()
            .skip(to_usize(page.offset()))
            .take(to_usize(u64::from(page.limit())))
            .collect();
        Ok(Page { items, total_count })
    }
}

/// Limit/offset pushed down to one category store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushdownStrategy {
    category: Category,
}

impl PushdownStrategy {
    /// Paginates `category` in its store.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self { category }
    }
}

#[async_trait]
impl PaginationStrategy for PushdownStrategy {
    fn name(&self) -> &'static str {
        "pushdown"
    }

    async fn paginate(
        &self,
        sources: &TimelineSources,
        child_id: ChildId,
        window: Window,
        page: PageRequest,
    ) -> Result<Page<TimelineEntry>, TimelineError> {
        let fetched = sources
            .fetcher
            .fetch(child_id, self.category, window, Some(page))
            .await?;
        let entries = fetched.records.into_iter().map(normalize).collect();
        let items = sources.photos.decorate_all(entries).await?;
        Ok(Page {
            items,
            total_count: fetched.total_count,
        })
    }
}
