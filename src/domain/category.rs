//! The eight event categories and the canonical names shared by every
//! read and write path.
//!
//! Photo attachments are keyed by the category *name*, so the string
//! produced by [`Category::as_str`] is the only spelling the gateway ever
//! writes or queries with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of logged activity.
///
/// The declaration order is also the secondary sort key of the merged
/// timeline when two events of different categories share the same instant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Diaper change.
    Diaper,
    /// Bottle, breast or solid feeding.
    Feeding,
    /// Timed nursing session.
    Nursing,
    /// Sleep session.
    Sleep,
    /// Administered medication.
    Medication,
    /// Developmental milestone.
    Milestone,
    /// Growth or health measurement.
    Measurement,
    /// Standalone photo.
    Photo,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Diaper,
        Self::Feeding,
        Self::Nursing,
        Self::Sleep,
        Self::Medication,
        Self::Milestone,
        Self::Measurement,
        Self::Photo,
    ];

    /// Canonical category name used on the wire and as the photo
    /// attachment `item_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diaper => "diaper",
            Self::Feeding => "feeding",
            Self::Nursing => "nursing",
            Self::Sleep => "sleep",
            Self::Medication => "medication",
            Self::Milestone => "milestone",
            Self::Measurement => "measurement",
            Self::Photo => "photo",
        }
    }

    /// Name of the category-specific field that becomes `occurredAt`.
    #[must_use]
    pub const fn instant_field(self) -> &'static str {
        match self {
            Self::Sleep => "startTime",
            Self::Medication => "administeredAt",
            Self::Milestone => "achievedAt",
            Self::Diaper
            | Self::Feeding
            | Self::Nursing
            | Self::Measurement
            | Self::Photo => "timestamp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the eight canonical names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Which categories a timeline request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    /// Merge every category into one feed.
    All,
    /// A single category, paginated by the store.
    One(Category),
}

impl CategorySelector {
    /// Parses the optional `category` query value.
    ///
    /// A missing value and `"all"` select every category.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategory`] for any other value that is not a
    /// canonical category name.
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownCategory> {
        match raw {
            None | Some("all") => Ok(Self::All),
            Some(name) => name.parse().map(Self::One),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn serde_name_matches_canonical_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn near_miss_names_are_rejected() {
        assert!("feedings".parse::<Category>().is_err());
        assert!("diaperChange".parse::<Category>().is_err());
        assert!("Sleep".parse::<Category>().is_err());
    }

    #[test]
    fn instant_fields() {
        assert_eq!(Category::Sleep.instant_field(), "startTime");
        assert_eq!(Category::Medication.instant_field(), "administeredAt");
        assert_eq!(Category::Milestone.instant_field(), "achievedAt");
        assert_eq!(Category::Feeding.instant_field(), "timestamp");
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(CategorySelector::parse(None), Ok(CategorySelector::All));
        assert_eq!(CategorySelector::parse(Some("all")), Ok(CategorySelector::All));
        assert_eq!(
            CategorySelector::parse(Some("sleep")),
            Ok(CategorySelector::One(Category::Sleep))
        );
        assert_eq!(
            CategorySelector::parse(Some("naps")),
            Err(UnknownCategory("naps".to_string()))
        );
    }
}
