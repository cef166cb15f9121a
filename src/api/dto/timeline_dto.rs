//! Timeline and statistics DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{PaginationMeta, TimelineEntry};
use crate::service::TimelinePage;

/// Query parameters for `GET /children/{child_id}/timeline`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimelineParams {
    /// Page number (1-indexed). Defaults to 1.
    pub page: Option<u32>,
    /// Entries per page. Defaults to the configured page size.
    pub limit: Option<u32>,
    /// Inclusive lower bound (RFC 3339 or `YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive upper bound (RFC 3339 or `YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// `all` (default) or one category name.
    pub category: Option<String>,
}

/// Response body for `GET /children/{child_id}/timeline`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineResponse {
    /// Entries, newest first.
    pub entries: Vec<TimelineEntry>,
    /// Page position and totals.
    pub pagination: PaginationMeta,
}

impl From<TimelinePage> for TimelineResponse {
    fn from(page: TimelinePage) -> Self {
        Self {
            entries: page.entries,
            pagination: page.pagination,
        }
    }
}

/// Query parameters for `GET /children/{child_id}/statistics`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatisticsParams {
    /// Category to aggregate.
    pub category: String,
    /// Inclusive lower bound. Defaults to the configured number of days ago.
    pub start_date: Option<String>,
    /// Inclusive upper bound. Defaults to now.
    pub end_date: Option<String>,
}
