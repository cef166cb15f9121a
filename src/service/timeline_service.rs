//! Timeline engine: validates a query, picks a pagination strategy and
//! wraps the resulting page in its pagination metadata.

use chrono::{DateTime, Utc};

use super::TimelineSources;
use super::strategy::strategy_for;
use crate::domain::{
    CategorySelector, ChildId, PageRequest, PaginationMeta, TimelineEntry, Window,
};
use crate::error::TimelineError;

/// A validated timeline request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineQuery {
    /// Child whose events are listed. Authorization happened upstream.
    pub child_id: ChildId,
    /// All categories or exactly one.
    pub selector: CategorySelector,
    /// Instant range applied to every category.
    pub window: Window,
    /// Requested page.
    pub page: PageRequest,
}

impl TimelineQuery {
    /// Validates raw request parts.
    ///
    /// `category` may be absent, `"all"` or a canonical category name.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidCategory`] for any other category
    /// string, and [`TimelineError::InvalidWindow`] if `end` is before
    /// `start`.
    pub fn parse(
        child_id: ChildId,
        category: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        page: PageRequest,
    ) -> Result<Self, TimelineError> {
        Ok(Self {
            child_id,
            selector: CategorySelector::parse(category)?,
            window: Window::new(start, end)?,
            page,
        })
    }
}

/// One page of the unified feed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePage {
    /// Entries, newest first.
    pub entries: Vec<TimelineEntry>,
    /// Page position and totals.
    pub pagination: PaginationMeta,
}

/// Read side of the unified feed.
#[derive(Debug, Clone)]
pub struct TimelineService {
    sources: TimelineSources,
}

impl TimelineService {
    /// Creates a service reading from `sources`.
    #[must_use]
    pub fn new(sources: TimelineSources) -> Self {
        Self { sources }
    }

    /// The stores this service reads from.
    #[must_use]
    pub fn sources(&self) -> &TimelineSources {
        &self.sources
    }

    /// Returns one page of the child's timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Store`] if any store read fails.
    pub async fn timeline(&self, query: TimelineQuery) -> Result<TimelinePage, TimelineError> {
        let strategy = strategy_for(query.selector);
        let page = strategy
            .paginate(&self.sources, query.child_id, query.window, query.page)
            .await?;
        let pagination = PaginationMeta::new(query.page, page.total_count);

        tracing::debug!(
            child_id = %query.child_id,
            mode = strategy.name(),
            page = pagination.page,
            limit = pagination.limit,
            total = pagination.total_count,
            "timeline aggregated"
        );

        Ok(TimelinePage {
            entries: page.items,
            pagination,
        })
    }
}
