//! # babylog-gateway
//!
//! REST gateway for a family baby-activity log.
//!
//! Caregivers log events in eight categories (diapers, feedings, nursing,
//! sleep, medication, milestones, measurements and photos), each stored in
//! its own table. The gateway merges them into one reverse-chronological
//! timeline per child, decorated with the photos attached to each event,
//! and pages through it with one of two strategies: merge-then-slice
//! across every category, or limit/offset pushed down to a single
//! category's store.
//!
//! Children are managed here too; deleting a child removes its events and
//! their photos.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TimelineService ── PaginationStrategy (Merge | Pushdown)
//!     ├── ChildService, EventService, StatisticsService (service/)
//!     │       │
//!     │       ├── CategoryFetcher
//!     │       └── PhotoIndex
//!     │
//!     └── ChildStore + EventStore + PhotoStore (persistence/)
//!             ├── MemoryStore
//!             └── PostgresStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
