//! The pagination contract shared by both timeline strategies.

use serde::Serialize;
use utoipa::ToSchema;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a page request. `page` and `limit` are raised to at least 1.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Page number, starting at 1.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of entries on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of entries preceding this page: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of results plus the size of the full result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Entries on this page, in feed order.
    pub items: Vec<T>,
    /// Number of entries matching the query across all pages.
    pub total_count: u64,
}

/// Pagination metadata returned with every timeline page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Entries per page.
    pub limit: u32,
    /// Total number of matching entries.
    pub total_count: u64,
    /// `ceil(total_count / limit)`; zero when nothing matched.
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Builds the metadata for `request` over `total_count` entries.
    #[must_use]
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        Self {
            page: request.page(),
            limit: request.limit(),
            total_count,
            total_pages: total_count.div_ceil(u64::from(request.limit())),
        }
    }
}
