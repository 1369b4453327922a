//! Core data models for the Technician Pay Distribution Engine.
//!
//! This module contains the input records the engine consumes (jobs,
//! technicians, time entries, mileage rates) and the derived views it
//! produces (pay breakdowns and summaries).

mod job;
mod mileage_rate;
mod pay_breakdown;
mod pay_period;
mod summary;
mod technician;
mod time_entry;

pub use job::{Job, JobId, JobStatus};
pub use mileage_rate::{MileageRate, MileageRateHistory};
pub use pay_breakdown::{
    AuditStep, AuditTrace, AuditWarning, EntryPayDetail, JobPayBreakdown, PayTotals,
    TechnicianPay, WarningSeverity,
};
pub use pay_period::ReportingPeriod;
pub use summary::{PeriodSummary, PeriodTechnicianSummary, TechnicianJobPay, TechnicianSummary};
pub use technician::{Technician, TechnicianId, TechnicianStatus};
pub use time_entry::{EntryId, EntryStatus, TimeEntry};
