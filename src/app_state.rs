//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ApiSettings;
use crate::persistence::{ChildStore, EventStore, PhotoStore};
use crate::service::{
    CategoryFetcher, ChildService, EventService, PhotoIndex, StatisticsService,
    TimelineService, TimelineSources,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Child CRUD.
    pub child_service: Arc<ChildService>,
    /// Unified feed reads.
    pub timeline_service: Arc<TimelineService>,
    /// Event writes and single-event reads.
    pub event_service: Arc<EventService>,
    /// Per-day aggregates.
    pub statistics_service: Arc<StatisticsService>,
    /// Request defaults (page size, statistics window).
    pub settings: ApiSettings,
}

impl AppState {
    /// Wires every service over the given stores.
    #[must_use]
    pub fn new(
        children: Arc<dyn ChildStore>,
        events: Arc<dyn EventStore>,
        photos: Arc<dyn PhotoStore>,
        settings: ApiSettings,
    ) -> Self {
        let fetcher = CategoryFetcher::new(Arc::clone(&events));
        let photo_index = PhotoIndex::new(photos);
        let sources = TimelineSources {
            fetcher: fetcher.clone(),
            photos: photo_index.clone(),
        };

        Self {
            child_service: Arc::new(ChildService::new(children)),
            timeline_service: Arc::new(TimelineService::new(sources)),
            event_service: Arc::new(EventService::new(events, photo_index)),
            statistics_service: Arc::new(StatisticsService::new(
                fetcher,
                settings.statistics_default_days,
            )),
            settings,
        }
    }
}
