//! Service layer: the timeline engine and the write path around it.
//!
//! [`TimelineService`] answers feed queries by handing a
//! [`TimelineSources`] to one of two [`PaginationStrategy`] impls.
//! [`EventService`] and [`StatisticsService`] cover writes and per-day
//! aggregates over the same stores; [`ChildService`] manages the children
//! those events belong to.

pub mod child_service;
pub mod event_service;
pub mod fetcher;
pub mod photo_index;
pub mod statistics_service;
pub mod strategy;
pub mod timeline_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use child_service::ChildService;
pub use event_service::EventService;
pub use fetcher::{CategoryFetcher, Fetched};
pub use photo_index::PhotoIndex;
pub use statistics_service::{DailyStat, StatisticsService};
pub use strategy::{
    MergeStrategy, PaginationStrategy, PushdownStrategy, TimelineSources, strategy_for,
};
pub use timeline_service::{TimelinePage, TimelineQuery, TimelineService};
