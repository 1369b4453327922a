//! Error types for the Technician Pay Distribution Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading configuration,
//! validating inputs, or computing pay.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::EntryStatus;

/// The main error type for the Technician Pay Distribution Engine.
///
/// Note that an unknown job is *not* an error: the engine reports it as
/// `None` and leaves the response to the caller.
///
/// # Example
///
/// ```
/// use tech_pay_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The mileage rate history contains overlapping or inverted intervals.
    #[error("Invalid mileage rate history at {effective_date}: {message}")]
    InvalidMileageRates {
        /// The effective date of the offending interval.
        effective_date: NaiveDate,
        /// A description of the problem.
        message: String,
    },

    /// A job record was invalid.
    #[error("Invalid job {job_id}: {message}")]
    InvalidJob {
        /// The ID of the invalid job.
        job_id: u64,
        /// A description of what made the job invalid.
        message: String,
    },

    /// A technician record was invalid.
    #[error("Invalid technician {tech_id}: {message}")]
    InvalidTechnician {
        /// The ID of the invalid technician.
        tech_id: u64,
        /// A description of what made the technician invalid.
        message: String,
    },

    /// A time entry was invalid or contained inconsistent data.
    #[error("Invalid time entry {entry_id}: {message}")]
    InvalidTimeEntry {
        /// The ID of the invalid entry.
        entry_id: u64,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// A reporting period had its bounds the wrong way round.
    #[error("Invalid reporting period: start {start_date} is after end {end_date}")]
    InvalidPeriod {
        /// The requested start date.
        start_date: NaiveDate,
        /// The requested end date.
        end_date: NaiveDate,
    },

    /// A time entry status change is not allowed by the entry lifecycle.
    #[error("Time entry {entry_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// The ID of the entry.
        entry_id: u64,
        /// The current status.
        from: EntryStatus,
        /// The requested status.
        to: EntryStatus,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
