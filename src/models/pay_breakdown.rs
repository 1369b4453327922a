//! Pay breakdown models.
//!
//! This module contains the [`JobPayBreakdown`] type and its associated
//! structures that capture everything the engine derives for a single job:
//! the job-level figures, each technician's split, job totals, and an audit
//! trace of the decisions made along the way.
//!
//! Breakdowns are derived views. They are recomputed on demand and carry no
//! timestamps or random identifiers, so the same inputs always produce an
//! identical breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Job, TechnicianId, TimeEntry};

/// A time entry together with the mileage rate applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPayDetail {
    /// The original entry, unchanged.
    pub entry: TimeEntry,
    /// The mileage rate resolved for the entry's date.
    pub mileage_rate: Decimal,
    /// `mileage × mileage_rate`, rounded to cents.
    pub mileage_pay: Decimal,
}

/// One technician's share of a job.
///
/// Money values are rounded to cents and the weight to four places.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::TechnicianPay;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let pay = TechnicianPay {
///     tech_id: 1,
///     tech_name: "Alex Rivera".to_string(),
///     hours: Decimal::from_str("10.00").unwrap(),
///     min_pay: Decimal::from_str("20.00").unwrap(),
///     weight: Decimal::from_str("0.5714").unwrap(),
///     base_pay: Decimal::from_str("257.14").unwrap(),
///     mileage: Decimal::ZERO,
///     mileage_pay: Decimal::ZERO,
///     per_diem: Decimal::ZERO,
///     personal_expenses: Decimal::ZERO,
///     total_pay: Decimal::from_str("257.14").unwrap(),
///     effective_rate: Decimal::from_str("25.71").unwrap(),
///     using_minimum: false,
///     entries: vec![],
/// };
/// let json = serde_json::to_value(&pay).unwrap();
/// assert_eq!(json["base_pay"], "257.14");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianPay {
    /// The technician this share belongs to.
    pub tech_id: TechnicianId,
    /// The technician's display name.
    pub tech_name: String,
    /// Total hours logged on the job.
    pub hours: Decimal,
    /// The technician's guaranteed minimum hourly rate.
    pub min_pay: Decimal,
    /// Share of the tech pool.
    pub weight: Decimal,
    /// Labour pay, excluding reimbursements.
    pub base_pay: Decimal,
    /// Total miles driven.
    pub mileage: Decimal,
    /// Mileage reimbursement.
    pub mileage_pay: Decimal,
    /// Per diem total.
    pub per_diem: Decimal,
    /// Personal expenses total.
    pub personal_expenses: Decimal,
    /// Base pay plus all reimbursements.
    pub total_pay: Decimal,
    /// Base pay divided by hours (or the minimum rate when no hours were logged).
    pub effective_rate: Decimal,
    /// True when the minimum floor raised the base pay.
    pub using_minimum: bool,
    /// The entries that made up this share.
    pub entries: Vec<EntryPayDetail>,
}

/// Summed pay figures.
///
/// Used for job-level totals and for summaries across jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    /// Total hours.
    pub total_hours: Decimal,
    /// Total base pay.
    pub total_base_pay: Decimal,
    /// Total mileage reimbursement.
    pub total_mileage_pay: Decimal,
    /// Total per diem.
    pub total_per_diem: Decimal,
    /// Total personal expenses.
    pub total_personal_expenses: Decimal,
    /// Total pay including reimbursements.
    pub total_pay: Decimal,
}

impl PayTotals {
    /// Adds a technician's figures to the running totals.
    pub fn add(&mut self, pay: &TechnicianPay) {
        self.total_hours += pay.hours;
        self.total_base_pay += pay.base_pay;
        self.total_mileage_pay += pay.mileage_pay;
        self.total_per_diem += pay.per_diem;
        self.total_personal_expenses += pay.personal_expenses;
        self.total_pay += pay.total_pay;
    }

    /// Adds another set of totals to these.
    pub fn merge(&mut self, other: &PayTotals) {
        self.total_hours += other.total_hours;
        self.total_base_pay += other.total_base_pay;
        self.total_mileage_pay += other.total_mileage_pay;
        self.total_per_diem += other.total_per_diem;
        self.total_personal_expenses += other.total_personal_expenses;
        self.total_pay += other.total_pay;
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How urgently a warning needs a human to look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Should be reviewed before payroll closes.
    Medium,
    /// Likely a data problem affecting pay.
    High,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

/// The complete audit trace for a job calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The complete pay breakdown for one job.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::{AuditTrace, Job, JobPayBreakdown, JobStatus, PayTotals};
/// use rust_decimal::Decimal;
///
/// let breakdown = JobPayBreakdown {
///     job: Job {
///         id: 1,
///         ticket_number: None,
///         description: "Survey".to_string(),
///         client_name: None,
///         billing_amount: None,
///         expenses: None,
///         commissions: None,
///         status: JobStatus::Pending,
///     },
///     job_net: Decimal::ZERO,
///     tech_pool: Decimal::ZERO,
///     total_deductions: Decimal::ZERO,
///     floor_excess: Decimal::ZERO,
///     technicians: vec![],
///     totals: PayTotals::default(),
///     audit_trace: AuditTrace::default(),
/// };
/// assert!(breakdown.technician(1).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayBreakdown {
    /// The job the breakdown is for.
    pub job: Job,
    /// Billing amount minus expenses and commissions. May be negative.
    pub job_net: Decimal,
    /// The technicians' half of the net after reimbursements, never negative.
    pub tech_pool: Decimal,
    /// Mileage pay, per diem and personal expenses across all technicians.
    pub total_deductions: Decimal,
    /// How far minimum floors pushed total base pay above the pool.
    pub floor_excess: Decimal,
    /// Per-technician shares, ordered by technician id.
    pub technicians: Vec<TechnicianPay>,
    /// Job-level totals.
    pub totals: PayTotals,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

impl JobPayBreakdown {
    /// Finds a technician's share of this job.
    pub fn technician(&self, tech_id: TechnicianId) -> Option<&TechnicianPay> {
        self.technicians.iter().find(|t| t.tech_id == tech_id)
    }
}
