//! Request types for the pay engine API.
//!
//! Every pay request carries the snapshot of records to compute from, so
//! each calculation sees one consistent set of data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{JobId, ReportingPeriod, TechnicianId};
use crate::source::Snapshot;

/// Request body for `POST /pay/job`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayRequest {
    /// The job to compute.
    pub job_id: JobId,
    /// The records to compute from.
    pub snapshot: Snapshot,
}

impl JobPayRequest {
    /// Validates the snapshot records.
    pub fn validate(&self) -> EngineResult<()> {
        self.snapshot.validate()
    }
}

/// Request body for `POST /pay/technician`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianSummaryRequest {
    /// The technician to summarise.
    pub tech_id: TechnicianId,
    /// First day of the range (inclusive). Unbounded when omitted.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the range (inclusive). Unbounded when omitted.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// The records to compute from.
    pub snapshot: Snapshot,
}

impl TechnicianSummaryRequest {
    /// Returns the requested range.
    pub fn period(&self) -> ReportingPeriod {
        ReportingPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Validates the range and the snapshot records.
    pub fn validate(&self) -> EngineResult<()> {
        self.period().validate()?;
        self.snapshot.validate()
    }
}

/// Request body for `POST /pay/period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummaryRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Limits the report to one technician.
    #[serde(default)]
    pub tech_id: Option<TechnicianId>,
    /// The records to compute from.
    pub snapshot: Snapshot,
}

impl PeriodSummaryRequest {
    /// Returns the requested period.
    pub fn period(&self) -> ReportingPeriod {
        ReportingPeriod::between(self.start_date, self.end_date)
    }

    /// Validates the period and the snapshot records.
    pub fn validate(&self) -> EngineResult<()> {
        self.period().validate()?;
        self.snapshot.validate()
    }
}

/// Query string for `GET /mileage-rates/current`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentRateQuery {
    /// The date to resolve. Today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_deserialize_job_pay_request() {
        let json = r#"{
            "job_id": 12,
            "snapshot": {
                "jobs": [{ "id": 12, "description": "Furnace install", "billing_amount": "1200.00" }],
                "technicians": [{ "id": 3, "name": "Alex Rivera", "min_pay": "22.50" }],
                "time_entries": [
                    { "id": 1, "job_id": 12, "tech_id": 3, "date_worked": "2025-03-03", "hours_worked": "6.5" }
                ]
            }
        }"#;

        let request: JobPayRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.job_id, 12);
        assert_eq!(request.snapshot.time_entries.len(), 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_technician_request_dates_are_optional() {
        let json = r#"{ "tech_id": 3, "snapshot": {} }"#;

        let request: TechnicianSummaryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.period(), ReportingPeriod::all_time());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_period_request_rejects_inverted_range() {
        let json = r#"{ "start_date": "2025-03-31", "end_date": "2025-03-01", "snapshot": {} }"#;

        let request: PeriodSummaryRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_period_request_requires_dates() {
        let json = r#"{ "end_date": "2025-03-01", "snapshot": {} }"#;
        let result: Result<PeriodSummaryRequest, _> = serde_json::from_str(json);
        assert!(result.unwrap_err().to_string().contains("missing field"));
    }
}
