//! HTTP API module for the Technician Pay Distribution Engine.
//!
//! This module provides the REST endpoints for computing job pay,
//! technician and period summaries, and for inspecting the configured
//! mileage rates.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CurrentRateQuery, JobPayRequest, PeriodSummaryRequest, TechnicianSummaryRequest};
pub use response::{
    ApiError, ApiErrorResponse, CurrentMileageRateResponse, MileageRatesResponse, PayResponse,
};
pub use state::AppState;
