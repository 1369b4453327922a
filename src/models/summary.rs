//! Summary models.
//!
//! Summaries roll up per-job breakdowns for one technician, or for every
//! technician paid in a reporting period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Job, PayTotals, ReportingPeriod, TechnicianId, TechnicianPay};

/// A technician's share of one job, as listed in a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianJobPay {
    /// The job.
    pub job: Job,
    /// Distinct dates the technician worked on the job, ascending.
    pub entry_dates: Vec<NaiveDate>,
    /// `entry_dates` as a single date or a `first - last` range.
    pub date_display: Option<String>,
    /// The technician's share of the job.
    pub tech_pay: TechnicianPay,
}

/// A technician's pay across all jobs touched in a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianSummary {
    /// The technician summarised.
    pub tech_id: TechnicianId,
    /// The range the entries were selected from.
    pub period: ReportingPeriod,
    /// One line per job, ordered by job id.
    pub jobs: Vec<TechnicianJobPay>,
    /// Sum of the job lines.
    pub totals: PayTotals,
}

/// One technician's section of a period payroll summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTechnicianSummary {
    /// The technician.
    pub tech_id: TechnicianId,
    /// The technician's display name.
    pub tech_name: String,
    /// The technician's minimum hourly rate.
    pub min_pay: Decimal,
    /// One line per job, ordered by first date worked.
    pub jobs: Vec<TechnicianJobPay>,
    /// Sum of the job lines.
    pub totals: PayTotals,
}

/// Payroll across technicians for a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// The period covered.
    pub period: ReportingPeriod,
    /// Per-technician sections, ordered by name.
    pub technicians: Vec<PeriodTechnicianSummary>,
    /// Sum across all technicians.
    pub grand_totals: PayTotals,
    /// Number of technicians paid in the period.
    pub technician_count: usize,
}
