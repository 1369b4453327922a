//! Response types for the pay engine API.
//!
//! This module defines the success envelope and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::MileageRateLookup;
use crate::error::EngineError;
use crate::models::{JobId, MileageRate};

/// Envelope for a successful calculation.
///
/// The wrapped result is deterministic. The envelope carries the
/// per-request metadata so that repeating a request yields the same
/// `result` with a fresh `calculation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayResponse<T> {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Time spent computing, in microseconds.
    pub duration_us: u64,
    /// The computed result.
    pub result: T,
}

impl<T> PayResponse<T> {
    /// Wraps a result computed under `calculation_id`.
    pub fn new(calculation_id: Uuid, duration_us: u64, result: T) -> Self {
        Self {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            duration_us,
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for PayResponse<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self),
        )
            .into_response()
    }
}

/// Body of `GET /mileage-rates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileageRatesResponse {
    /// Version of the loaded configuration.
    pub config_version: String,
    /// Configured rates, newest first.
    pub rates: Vec<MileageRate>,
}

/// Body of `GET /mileage-rates/current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMileageRateResponse {
    /// The date resolved.
    pub date: NaiveDate,
    /// The rate per mile that applies on `date`.
    pub rate_per_mile: Decimal,
    /// The configured rate window covering `date`, if any.
    pub interval: Option<MileageRate>,
    /// True when no window covers `date` and the fallback rate was used.
    pub used_fallback: bool,
}

impl From<MileageRateLookup> for CurrentMileageRateResponse {
    fn from(lookup: MileageRateLookup) -> Self {
        Self {
            date: lookup.date,
            rate_per_mile: lookup.rate,
            interval: lookup.interval,
            used_fallback: lookup.used_fallback,
        }
    }
}

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

    /// Creates a job not found error response.
    pub fn job_not_found(job_id: JobId) -> Self {
        Self::with_details(
            "JOB_NOT_FOUND",
            format!("Job not found: {}", job_id),
            format!("The snapshot does not contain a job with id {}", job_id),
        )
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
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 404 response for a missing job.
    pub fn job_not_found(job_id: JobId) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::job_not_found(job_id),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidMileageRates { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::InvalidJob { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_JOB",
                    message,
                    "The job data contains invalid information",
                ),
            ),
            EngineError::InvalidTechnician { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_TECHNICIAN",
                    message,
                    "The technician data contains invalid information",
                ),
            ),
            EngineError::InvalidTimeEntry { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_TIME_ENTRY",
                    message,
                    "The time entry data contains invalid information",
                ),
            ),
            EngineError::InvalidPeriod { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "The start date must not be after the end date",
                ),
            ),
            EngineError::InvalidStatusTransition { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("INVALID_STATUS_TRANSITION", message),
            },
        }
    }
}
