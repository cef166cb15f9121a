//! Children: the aggregate every logged event belongs to.
//!
//! A birth date may lie in the future (an expected baby). Such a child is
//! stored and served like any other; only [`Child::age_days`] reports that
//! the child is not born yet.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ChildId;

/// Fields a caller sets when creating or editing a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildProfile {
    /// Display name.
    pub name: String,
    /// Birth date, possibly in the future.
    pub birth_date: DateTime<Utc>,
    /// Gender as entered.
    pub gender: String,
    /// Profile photo location.
    pub photo_url: Option<String>,
}

/// Why a [`ChildProfile`] was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} must not be blank")]
pub struct BlankField(pub &'static str);

impl ChildProfile {
    /// Trims text fields, rejects blank ones and cuts the birth date to
    /// microseconds.
    ///
    /// # Errors
    ///
    /// Returns [`BlankField`] if the name or gender is empty after trimming.
    pub fn normalized(self) -> Result<Self, BlankField> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(BlankField("name"));
        }
        let gender = self.gender.trim().to_string();
        if gender.is_empty() {
            return Err(BlankField("gender"));
        }
        Ok(Self {
            name,
            birth_date: self.birth_date.trunc_subsecs(6),
            gender,
            photo_url: self
                .photo_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        })
    }
}

/// A child to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChild {
    /// Pre-generated identifier.
    pub id: ChildId,
    /// User who created the child, when known.
    pub owner_id: Option<uuid::Uuid>,
    /// Editable fields.
    pub profile: ChildProfile,
}

/// A stored child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    /// Child identifier.
    pub id: ChildId,
    /// User who created the child, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<uuid::Uuid>,
    /// Display name.
    pub name: String,
    /// Birth date, possibly in the future.
    pub birth_date: DateTime<Utc>,
    /// Gender as entered.
    pub gender: String,
    /// Profile photo location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// When the child was first stored.
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Builds a stored child from its parts.
    #[must_use]
    pub fn from_parts(
        id: ChildId,
        owner_id: Option<uuid::Uuid>,
        profile: ChildProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name: profile.name,
            birth_date: profile.birth_date,
            gender: profile.gender,
            photo_url: profile.photo_url,
            created_at,
        }
    }

    /// Replaces every editable field.
    pub fn apply(&mut self, profile: ChildProfile) {
        self.name = profile.name;
        self.birth_date = profile.birth_date;
        self.gender = profile.gender;
        self.photo_url = profile.photo_url;
    }

    /// Whole days since birth at `now`, or `None` while the birth date is
    /// still ahead.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        (self.birth_date <= now).then(|| (now - self.birth_date).num_days())
    }
}
