//! Read-only access to the records the engine computes from.
//!
//! The engine never owns or mutates jobs, technicians or time entries. It
//! asks a [`PayDataSource`] for them, which lets the same pipeline run over
//! a database-backed store or an in-memory [`Snapshot`] posted to the API.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Job, JobId, ReportingPeriod, Technician, TechnicianId, TimeEntry};

/// Provides the records pay is computed from.
pub trait PayDataSource {
    /// Finds a job by id.
    fn job(&self, job_id: JobId) -> Option<&Job>;

    /// Returns every entry logged against a job, assigned or not.
    fn entries_for_job(&self, job_id: JobId) -> Vec<&TimeEntry>;

    /// Returns a technician's entries dated within `period`.
    fn entries_for_technician(
        &self,
        tech_id: TechnicianId,
        period: &ReportingPeriod,
    ) -> Vec<&TimeEntry>;

    /// Returns every entry dated within `period`.
    fn entries_in_period(&self, period: &ReportingPeriod) -> Vec<&TimeEntry>;

    /// Finds a technician by id.
    fn technician(&self, tech_id: TechnicianId) -> Option<&Technician>;
}

/// An in-memory set of records.
///
/// # Example
///
/// ```
/// use tech_pay_engine::source::{PayDataSource, Snapshot};
///
/// let snapshot: Snapshot = serde_json::from_str(
///     r#"{ "jobs": [{ "id": 1, "description": "Boiler service" }] }"#,
/// ).unwrap();
///
/// assert!(snapshot.job(1).is_some());
/// assert!(snapshot.entries_for_job(1).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All jobs.
    #[serde(default)]
    pub jobs: Vec<Job>,
    /// All technicians.
    #[serde(default)]
    pub technicians: Vec<Technician>,
    /// All time entries.
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

impl Snapshot {
    /// Validates every record in the snapshot.
    ///
    /// Stops at the first invalid job, technician or entry.
    pub fn validate(&self) -> EngineResult<()> {
        self.jobs.iter().try_for_each(Job::validate)?;
        self.technicians.iter().try_for_each(Technician::validate)?;
        self.time_entries.iter().try_for_each(TimeEntry::validate)
    }
}

impl PayDataSource for Snapshot {
    fn job(&self, job_id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == job_id)
    }

    fn entries_for_job(&self, job_id: JobId) -> Vec<&TimeEntry> {
        self.time_entries
            .iter()
            .filter(|entry| entry.job_id == job_id)
            .collect()
    }

    fn entries_for_technician(
        &self,
        tech_id: TechnicianId,
        period: &ReportingPeriod,
    ) -> Vec<&TimeEntry> {
        self.time_entries
            .iter()
            .filter(|entry| entry.tech_id == Some(tech_id))
            .filter(|entry| period.contains_date(entry.date_worked))
            .collect()
    }

    fn entries_in_period(&self, period: &ReportingPeriod) -> Vec<&TimeEntry> {
        self.time_entries
            .iter()
            .filter(|entry| period.contains_date(entry.date_worked))
            .collect()
    }

    fn technician(&self, tech_id: TechnicianId) -> Option<&Technician> {
        self.technicians.iter().find(|tech| tech.id == tech_id)
    }
}
