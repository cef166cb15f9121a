//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON bodies use camelCase keys. Timeline entries and payloads are
//! serialized straight from the domain types.

pub mod child_dto;
pub mod common_dto;
pub mod event_dto;
pub mod timeline_dto;

pub use child_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use timeline_dto::*;
