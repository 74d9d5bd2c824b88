//! Response types for the leave engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the small success bodies the handlers return.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{Balance, DayClass, ToggleOutcome};
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A vacation toggle on a day that cannot hold one.
    pub fn day_not_selectable(class: DayClass) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: ApiError::with_details(
                "DAY_NOT_SELECTABLE",
                format!("Vacation cannot be recorded on a {} day", class),
                "Weekends and non-worked public holidays are not selectable for vacation",
            ),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::PartnerNotFound { id } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "PARTNER_NOT_FOUND",
                    message,
                    format!("No partner with id '{}' exists in the roster", id),
                ),
            ),
            EngineError::LimitExceeded { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("LIMIT_EXCEEDED", message),
            ),
            EngineError::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("STORE_TIMEOUT", message),
            ),
            EngineError::PersistenceFailure { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("PERSISTENCE_FAILURE", message),
            ),
            EngineError::StoreUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
            EngineError::HolidayFetch { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("HOLIDAY_FETCH_FAILED", message),
            ),
            EngineError::InvalidWeekday { .. } | EngineError::DateOutsideYear { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
        };
        ApiErrorResponse { status, error }
    }
}

/// Body of `PUT /api/data`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

/// Body of a successful `POST /api/partners/:id/days`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    /// What the toggle did.
    pub outcome: ToggleOutcome,
    /// The partner's balance after the toggle.
    pub balance: Balance,
}
