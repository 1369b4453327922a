//! Job model.
//!
//! A job is a billable work order. Only its money fields feed the pay
//! calculation; the rest is carried through to reports for reference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Identifier of a job.
pub type JobId = u64;

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created but not yet assigned.
    #[default]
    Pending,
    /// Assigned to one or more technicians.
    Assigned,
    /// Work has started.
    InProgress,
    /// Work is finished.
    Completed,
    /// The job was cancelled.
    Cancelled,
}

/// A field-service job.
///
/// Money fields are optional; a missing value counts as zero.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::{Job, JobStatus};
/// use rust_decimal::Decimal;
///
/// let job = Job {
///     id: 1,
///     ticket_number: Some("WM-1001".to_string()),
///     description: "Replace POS terminal".to_string(),
///     client_name: None,
///     billing_amount: Some(Decimal::new(100000, 2)),
///     expenses: None,
///     commissions: None,
///     status: JobStatus::Completed,
/// };
/// assert_eq!(job.expenses_or_zero(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for the job.
    pub id: JobId,
    /// Ticket number on the originating platform.
    #[serde(default)]
    pub ticket_number: Option<String>,
    /// Short description of the work.
    #[serde(default)]
    pub description: String,
    /// Name of the client being billed.
    #[serde(default)]
    pub client_name: Option<String>,
    /// Revenue charged to the client.
    #[serde(default)]
    pub billing_amount: Option<Decimal>,
    /// Operating expenses taken off the top.
    #[serde(default)]
    pub expenses: Option<Decimal>,
    /// Commissions taken off the top.
    #[serde(default)]
    pub commissions: Option<Decimal>,
    /// Job lifecycle status.
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    /// Billing amount, treating null as zero.
    pub fn billing_amount_or_zero(&self) -> Decimal {
        self.billing_amount.unwrap_or(Decimal::ZERO)
    }

    /// Expenses, treating null as zero.
    pub fn expenses_or_zero(&self) -> Decimal {
        self.expenses.unwrap_or(Decimal::ZERO)
    }

    /// Commissions, treating null as zero.
    pub fn commissions_or_zero(&self) -> Decimal {
        self.commissions.unwrap_or(Decimal::ZERO)
    }

    /// Checks that none of the money fields are negative.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("billing_amount", self.billing_amount),
            ("expenses", self.expenses),
            ("commissions", self.commissions),
        ];
        let negative = fields
            .into_iter()
            .find_map(|(field, value)| value.filter(|v| *v < Decimal::ZERO).map(|v| (field, v)));

        match negative {
            Some((field, amount)) => Err(EngineError::InvalidJob {
                job_id: self.id,
                message: format!("{} cannot be negative (got {})", field, amount),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_job() -> Job {
        Job {
            id: 10,
            ticket_number: Some("FN-2231".to_string()),
            description: "Install access point".to_string(),
            client_name: Some("Acme Retail".to_string()),
            billing_amount: Some(dec("1000.00")),
            expenses: Some(dec("100.00")),
            commissions: None,
            status: JobStatus::Completed,
        }
    }

    #[test]
    fn test_deserialize_minimal_job() {
        let json = r#"{ "id": 5 }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, 5);
        assert_eq!(job.billing_amount, None);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.billing_amount_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_job_with_financials() {
        let json = r#"{
            "id": 6,
            "description": "Cable run",
            "billing_amount": "850.00",
            "expenses": "25.50",
            "commissions": "40",
            "status": "in_progress"
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.billing_amount_or_zero(), dec("850.00"));
        assert_eq!(job.expenses_or_zero(), dec("25.50"));
        assert_eq!(job.commissions_or_zero(), dec("40"));
        assert_eq!(job.status, JobStatus::InProgress);
    }

    #[test]
    fn test_null_money_fields_count_as_zero() {
        let job = create_test_job();
        assert_eq!(job.commissions_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_accepts_valid_job() {
        assert!(create_test_job().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_expenses() {
        let mut job = create_test_job();
        job.expenses = Some(dec("-1.00"));

        match job.validate() {
            Err(EngineError::InvalidJob { job_id, message }) => {
                assert_eq!(job_id, 10);
                assert!(message.contains("expenses"));
            }
            other => panic!("Expected InvalidJob error, got {:?}", other),
        }
    }
}
