//! Error types with HTTP status code mapping.
//!
//! [`TimelineError`] is the typed failure of the aggregation engine.
//! [`GatewayError`] is the central HTTP-facing error; each variant maps to a
//! specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BlankField, ChildId, InvalidWindow, ItemKey, UnknownCategory};
use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "invalid category: naps",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure of a timeline or statistics read.
///
/// Store failures abort the whole read; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// A category store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The requested category is neither `"all"` nor a canonical name.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// The requested window ends before it starts.
    #[error(transparent)]
    InvalidWindow(#[from] InvalidWindow),
}

impl From<UnknownCategory> for TimelineError {
    fn from(err: UnknownCategory) -> Self {
        Self::InvalidCategory(err.0)
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown category name.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// Time window ends before it starts.
    #[error("invalid window: {0}")]
    InvalidWindow(InvalidWindow),

    /// No event exists under the given key.
    #[error("event not found: {0}")]
    EventNotFound(ItemKey),

    /// No child exists under the given id.
    #[error("child not found: {0}")]
    ChildNotFound(ChildId),

    /// Storage layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidCategory(_) => 1002,
            Self::InvalidWindow(_) => 1003,
            Self::EventNotFound(_) => 2001,
            Self::ChildNotFound(_) => 2002,
            Self::Store(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidCategory(_) | Self::InvalidWindow(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::EventNotFound(_) | Self::ChildNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TimelineError> for GatewayError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::Store(e) => Self::Store(e),
            TimelineError::InvalidCategory(name) => Self::InvalidCategory(name),
            TimelineError::InvalidWindow(w) => Self::InvalidWindow(w),
        }
    }
}

impl From<UnknownCategory> for GatewayError {
    fn from(err: UnknownCategory) -> Self {
        Self::InvalidCategory(err.0)
    }
}

impl From<BlankField> for GatewayError {
    fn from(err: BlankField) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<InvalidWindow> for GatewayError {
    fn from(err: InvalidWindow) -> Self {
        Self::InvalidWindow(err)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
