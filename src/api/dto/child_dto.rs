//! Child DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::parse_instant;
use crate::domain::{Child, ChildProfile};
use crate::error::GatewayError;

/// Request body for creating or replacing a child.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildRequest {
    /// Display name.
    pub name: String,
    /// RFC 3339 instant or `YYYY-MM-DD`; may lie in the future.
    pub birth_date: String,
    /// Gender as entered.
    pub gender: String,
    /// Profile photo location.
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl ChildRequest {
    /// Parses the birth date and builds the editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `birthDate` is not a date.
    pub fn into_profile(self) -> Result<ChildProfile, GatewayError> {
        Ok(ChildProfile {
            birth_date: parse_instant("birthDate", &self.birth_date)?,
            name: self.name,
            gender: self.gender,
            photo_url: self.photo_url,
        })
    }
}

/// A child with its age at response time.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    /// Stored child.
    #[serde(flatten)]
    pub child: Child,
    /// Whole days since birth; `null` while the birth date is ahead.
    pub age_days: Option<i64>,
}

impl ChildResponse {
    /// Wraps `child`, computing its age at `now`.
    #[must_use]
    pub fn at(child: Child, now: DateTime<Utc>) -> Self {
        Self {
            age_days: child.age_days(now),
            child,
        }
    }
}
