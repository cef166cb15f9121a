//! Shared request parsing used across endpoints.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Category, EventId, ItemKey};
use crate::error::GatewayError;

/// Parses a `startDate`/`endDate` query value.
///
/// Accepts RFC 3339 instants and plain `YYYY-MM-DD` dates, the latter
/// meaning midnight UTC of that day.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field` if the value is
/// neither.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, GatewayError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| GatewayError::InvalidRequest(format!("{field} is not a date: {raw}")))
}

/// Parses an optional date parameter.
///
/// # Errors
///
/// See [`parse_instant`].
pub fn parse_optional_instant(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, GatewayError> {
    raw.map(|value| parse_instant(field, value)).transpose()
}

/// Builds the key of an event addressed as `/events/{category}/{id}`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidCategory`] for unknown category names.
pub fn item_key(category: &str, id: uuid::Uuid) -> Result<ItemKey, GatewayError> {
    let category: Category = category.parse()?;
    Ok(ItemKey::new(category, EventId::from_uuid(id)))
}
