//! Per-day statistics for one category.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::CategoryFetcher;
use crate::domain::{Category, ChildId, Window};
use crate::error::TimelineError;

/// Events of one category on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Number of events.
    pub count: u64,
    /// Sum of event durations in minutes (nursing and sleep only).
    pub total_duration: i64,
}

/// Aggregates a category into per-day counts and durations.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    fetcher: CategoryFetcher,
    default_days: u32,
}

impl StatisticsService {
    /// Creates a service whose default window spans `default_days` days.
    #[must_use]
    pub fn new(fetcher: CategoryFetcher, default_days: u32) -> Self {
        Self {
            fetcher,
            default_days,
        }
    }

    /// Fills in missing bounds: the end defaults to `now`, the start to
    /// `default_days` before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidWindow`] if the resolved end is
    /// before the resolved start.
    pub fn window(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Window, TimelineError> {
        let start = start.unwrap_or_else(|| now - Duration::days(i64::from(self.default_days)));
        let end = end.unwrap_or(now);
        Ok(Window::new(Some(start), Some(end))?)
    }

    /// Groups the child's `category` events inside `window` by UTC day,
    /// oldest day first. Days without events are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Store`] if the store read fails.
    pub async fn daily(
        &self,
        child_id: ChildId,
        category: Category,
        window: Window,
    ) -> Result<Vec<DailyStat>, TimelineError> {
        let fetched = self.fetcher.fetch(child_id, category, window, None).await?;

        let mut days: BTreeMap<NaiveDate, DailyStat> = BTreeMap::new();
        for record in &fetched.records {
            let date = record.occurred_at().date_naive();
            let stat = days.entry(date).or_insert(DailyStat {
                date,
                count: 0,
                total_duration: 0,
            });
            stat.count += 1;
            stat.total_duration += i64::from(record.payload.duration_minutes().unwrap_or(0));
        }

        tracing::debug!(%child_id, %category, days = days.len(), "statistics aggregated");
        Ok(days.into_values().collect())
    }
}
