//! HTTP request handlers for the pay engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::PayEngine;
use crate::models::{JobPayBreakdown, PeriodSummary, TechnicianSummary};

use super::request::{
    CurrentRateQuery, JobPayRequest, PeriodSummaryRequest, TechnicianSummaryRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CurrentMileageRateResponse, MileageRatesResponse, PayResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/pay/job", post(job_pay_handler))
        .route("/pay/technician", post(technician_summary_handler))
        .route("/pay/period", post(period_summary_handler))
        .route("/mileage-rates", get(mileage_rates_handler))
        .route("/mileage-rates/current", get(current_mileage_rate_handler))
        .with_state(state)
}

/// Maps a JSON body rejection to an API error.
///
/// Missing fields are validation errors. Anything else wrong with the body
/// is malformed JSON.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Runs request validation, logging and converting any failure.
fn validated<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
    validate: impl FnOnce(&T) -> crate::error::EngineResult<()>,
) -> Result<T, ApiErrorResponse> {
    let Json(request) = payload.map_err(|rejection| json_rejection(correlation_id, rejection))?;
    validate(&request).map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Request validation failed"
        );
        ApiErrorResponse::from(err)
    })?;
    Ok(request)
}

/// Handler for `POST /pay/job`.
///
/// Returns the job's breakdown, or 404 if the snapshot has no such job.
async fn job_pay_handler(
    State(state): State<AppState>,
    payload: Result<Json<JobPayRequest>, JsonRejection>,
) -> Result<PayResponse<JobPayBreakdown>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing job pay request");

    let request = validated(correlation_id, payload, JobPayRequest::validate)?;

    let start_time = Instant::now();
    let engine = PayEngine::new(&request.snapshot, state.config().config());
    let Some(breakdown) = engine.compute_job_pay(request.job_id) else {
        warn!(
            correlation_id = %correlation_id,
            job_id = request.job_id,
            "Job not found"
        );
        return Err(ApiErrorResponse::job_not_found(request.job_id));
    };
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        correlation_id = %correlation_id,
        job_id = request.job_id,
        technicians = breakdown.technicians.len(),
        total_pay = %breakdown.totals.total_pay,
        warnings = breakdown.audit_trace.warnings.len(),
        duration_us,
        "Job pay calculated"
    );
    Ok(PayResponse::new(correlation_id, duration_us, breakdown))
}

/// Handler for `POST /pay/technician`.
async fn technician_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<TechnicianSummaryRequest>, JsonRejection>,
) -> Result<PayResponse<TechnicianSummary>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing technician summary request");

    let request = validated(correlation_id, payload, TechnicianSummaryRequest::validate)?;

    let start_time = Instant::now();
    let engine = PayEngine::new(&request.snapshot, state.config().config());
    let summary = engine.compute_technician_summary(request.tech_id, &request.period());
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        correlation_id = %correlation_id,
        tech_id = request.tech_id,
        jobs = summary.jobs.len(),
        total_pay = %summary.totals.total_pay,
        duration_us,
        "Technician summary calculated"
    );
    Ok(PayResponse::new(correlation_id, duration_us, summary))
}

/// Handler for `POST /pay/period`.
async fn period_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodSummaryRequest>, JsonRejection>,
) -> Result<PayResponse<PeriodSummary>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing period summary request");

    let request = validated(correlation_id, payload, PeriodSummaryRequest::validate)?;

    let start_time = Instant::now();
    let engine = PayEngine::new(&request.snapshot, state.config().config());
    let summary = engine.compute_period_summary(&request.period(), request.tech_id);
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        correlation_id = %correlation_id,
        start_date = %request.start_date,
        end_date = %request.end_date,
        technicians = summary.technician_count,
        total_pay = %summary.grand_totals.total_pay,
        duration_us,
        "Period summary calculated"
    );
    Ok(PayResponse::new(correlation_id, duration_us, summary))
}

/// Handler for `GET /mileage-rates`.
async fn mileage_rates_handler(State(state): State<AppState>) -> Json<MileageRatesResponse> {
    let config = state.config();
    Json(MileageRatesResponse {
        config_version: config.metadata().version.clone(),
        rates: config.mileage_rates().rates().to_vec(),
    })
}

/// Handler for `GET /mileage-rates/current`.
///
/// Resolves the rate for `?date=YYYY-MM-DD`, or for today when omitted.
async fn current_mileage_rate_handler(
    State(state): State<AppState>,
    query: Result<Query<CurrentRateQuery>, QueryRejection>,
) -> Result<Json<CurrentMileageRateResponse>, ApiErrorResponse> {
    let Query(query) = query.map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let lookup = state.config().mileage_rate_for_date(date);
    if lookup.used_fallback {
        warn!(date = %date, "No mileage rate configured for requested date");
    }
    Ok(Json(lookup.into()))
}
