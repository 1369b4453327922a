//! Pipeline orchestration.
//!
//! [`calculate_job_pay`] runs the per-job pipeline over records it is handed.
//! [`PayEngine`] binds it to a [`PayDataSource`] and the loaded configuration
//! and adds the cross-job summaries.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{EngineConfig, EngineSettings};
use crate::models::{
    AuditTrace, AuditWarning, Job, JobId, JobPayBreakdown, MileageRateHistory, PeriodSummary,
    ReportingPeriod, Technician, TechnicianId, TechnicianSummary, TimeEntry, WarningSeverity,
};
use crate::source::PayDataSource;

use super::deductions::aggregate_deductions;
use super::entry_aggregator::aggregate_entries;
use super::job_net::calculate_job_net;
use super::pay_formatter::{JobFigures, format_breakdown};
use super::pool_allocator::{PoolAllocation, allocate_pool, calculate_tech_pool};
use super::summary::{
    summarize_period, summarize_period_technician, summarize_technician, technician_job_line,
};

/// Warning code for entry dates no mileage rate covers.
pub const WARNING_MILEAGE_RATE_MISSING: &str = "MILEAGE_RATE_MISSING";
/// Warning code for entries naming a technician that does not exist.
pub const WARNING_UNKNOWN_TECHNICIAN: &str = "UNKNOWN_TECHNICIAN";
/// Warning code for a pool clamped up from a negative value.
pub const WARNING_NEGATIVE_POOL: &str = "NEGATIVE_POOL";
/// Warning code for minimum floors pushing base pay past the pool.
pub const WARNING_MINIMUM_FLOOR_EXCESS: &str = "MINIMUM_FLOOR_EXCESS";

/// Computes the pay breakdown for one job.
///
/// This is the whole per-job pipeline: aggregate entries, compute the job
/// net, subtract reimbursements, halve into the tech pool, allocate with
/// minimum floors, and format. It is pure: the same inputs always produce
/// the same breakdown.
///
/// Every entry passed in is counted regardless of its status. Callers that
/// want only approved work filter before calling. A job with no assigned
/// entries gets an all-zero breakdown with no technicians.
///
/// # Arguments
///
/// * `job` - The job being paid out
/// * `entries` - The job's time entries
/// * `technicians` - Finds a technician by id
/// * `history` - Mileage rate history
/// * `settings` - Calculation settings
pub fn calculate_job_pay<'a, I, F>(
    job: &Job,
    entries: I,
    technicians: F,
    history: &MileageRateHistory,
    settings: &EngineSettings,
) -> JobPayBreakdown
where
    I: IntoIterator<Item = &'a TimeEntry>,
    F: Fn(TechnicianId) -> Option<&'a Technician>,
{
    let mut trace = AuditTrace::default();

    let aggregation = aggregate_entries(
        entries,
        technicians,
        history,
        settings.fallback_mileage_rate,
        1,
    );
    trace.steps.push(aggregation.audit_step.clone());

    if aggregation.technicians.is_empty() {
        debug!(
            job_id = job.id,
            unassigned_entries = aggregation.unassigned_entries,
            "No assigned time entries; returning zero breakdown"
        );
        return format_breakdown(
            job,
            JobFigures {
                job_net: Decimal::ZERO,
                total_deductions: Decimal::ZERO,
                tech_pool: Decimal::ZERO,
            },
            &[],
            &PoolAllocation::default(),
            trace,
        );
    }

    if !aggregation.missing_rate_dates.is_empty() {
        let dates: Vec<String> = aggregation
            .missing_rate_dates
            .iter()
            .map(|d| d.to_string())
            .collect();
        warn!(
            job_id = job.id,
            dates = %dates.join(", "),
            fallback_rate = %settings.fallback_mileage_rate,
            "No mileage rate configured for entry dates; using fallback"
        );
        trace.warnings.push(AuditWarning {
            code: WARNING_MILEAGE_RATE_MISSING.to_string(),
            message: format!(
                "No mileage rate covers {}; mileage priced at the fallback rate ${}",
                dates.join(", "),
                settings.fallback_mileage_rate
            ),
            severity: WarningSeverity::Medium,
        });
    }

    for tech_id in &aggregation.unknown_technicians {
        warn!(job_id = job.id, tech_id, "Time entries reference an unknown technician");
        trace.warnings.push(AuditWarning {
            code: WARNING_UNKNOWN_TECHNICIAN.to_string(),
            message: format!(
                "Technician {} was not found; paid with no minimum rate",
                tech_id
            ),
            severity: WarningSeverity::High,
        });
    }

    let net = calculate_job_net(job, 2);
    trace.steps.push(net.audit_step);

    let deductions = aggregate_deductions(&aggregation.technicians, 3);
    trace.steps.push(deductions.audit_step);

    let pool = calculate_tech_pool(net.job_net, deductions.deductions.total, 4);
    trace.steps.push(pool.audit_step);

    if pool.clamped {
        warn!(
            job_id = job.id,
            job_net = %net.job_net,
            total_deductions = %deductions.deductions.total,
            "Reimbursements exceed the job net; tech pool clamped to zero"
        );
        trace.warnings.push(AuditWarning {
            code: WARNING_NEGATIVE_POOL.to_string(),
            message: format!(
                "Job net ${} does not cover ${} in reimbursements; tech pool set to $0",
                net.job_net, deductions.deductions.total
            ),
            severity: WarningSeverity::Medium,
        });
    }

    let allocation = allocate_pool(pool.tech_pool, &aggregation.technicians, 5);
    trace.steps.extend(allocation.audit_steps.iter().cloned());

    if allocation.floor_excess > Decimal::ZERO {
        warn!(
            job_id = job.id,
            tech_pool = %pool.tech_pool,
            total_base_pay = %allocation.total_base_pay,
            floor_excess = %allocation.floor_excess,
            "Minimum floors pushed base pay above the tech pool"
        );
        trace.warnings.push(AuditWarning {
            code: WARNING_MINIMUM_FLOOR_EXCESS.to_string(),
            message: format!(
                "Minimum floors pay ${} more than the ${} tech pool",
                allocation.floor_excess, pool.tech_pool
            ),
            severity: WarningSeverity::Low,
        });
    }

    debug!(
        job_id = job.id,
        job_net = %net.job_net,
        total_deductions = %deductions.deductions.total,
        tech_pool = %pool.tech_pool,
        total_base_pay = %allocation.total_base_pay,
        technicians = aggregation.technicians.len(),
        "Computed job pay"
    );

    format_breakdown(
        job,
        JobFigures {
            job_net: net.job_net,
            total_deductions: deductions.deductions.total,
            tech_pool: pool.tech_pool,
        },
        &aggregation.technicians,
        &allocation,
        trace,
    )
}

/// Computes pay from a data source using the loaded configuration.
///
/// # Example
///
/// ```
/// use tech_pay_engine::calculation::PayEngine;
/// use tech_pay_engine::config::{EngineConfig, EngineMetadata, EngineSettings};
/// use tech_pay_engine::models::MileageRateHistory;
/// use tech_pay_engine::source::Snapshot;
///
/// let config = EngineConfig::new(
///     EngineMetadata { name: "Demo".to_string(), version: "1".to_string() },
///     EngineSettings::default(),
///     MileageRateHistory::default(),
/// );
/// let snapshot = Snapshot::default();
/// let engine = PayEngine::new(&snapshot, &config);
///
/// assert!(engine.compute_job_pay(1).is_none());
/// ```
pub struct PayEngine<'a, S: PayDataSource> {
    source: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: PayDataSource> PayEngine<'a, S> {
    /// Creates an engine over `source`.
    pub fn new(source: &'a S, config: &'a EngineConfig) -> Self {
        Self { source, config }
    }

    /// Computes the breakdown for a job, or `None` if the job does not exist.
    pub fn compute_job_pay(&self, job_id: JobId) -> Option<JobPayBreakdown> {
        let job = self.source.job(job_id)?;
        let entries = self.source.entries_for_job(job_id);

        Some(calculate_job_pay(
            job,
            entries,
            |tech_id| self.source.technician(tech_id),
            self.config.mileage_rates(),
            self.config.settings(),
        ))
    }

    /// Summarises a technician's pay across every job they logged time on
    /// within `period`.
    ///
    /// Entries are selected regardless of status. Each job is computed in
    /// full, so the technician's line matches the job's own breakdown.
    pub fn compute_technician_summary(
        &self,
        tech_id: TechnicianId,
        period: &ReportingPeriod,
    ) -> TechnicianSummary {
        let job_ids: BTreeSet<JobId> = self
            .source
            .entries_for_technician(tech_id, period)
            .iter()
            .map(|entry| entry.job_id)
            .collect();

        let breakdowns: Vec<JobPayBreakdown> = job_ids
            .into_iter()
            .filter_map(|job_id| self.compute_job_pay(job_id))
            .collect();

        debug!(tech_id, jobs = breakdowns.len(), "Computed technician summary");
        summarize_technician(tech_id, *period, &breakdowns)
    }

    /// Builds the payroll report for `period`.
    ///
    /// Only entries that are verified, billed or paid decide who appears and
    /// for which jobs. Passing `tech_id` limits the report to one technician.
    pub fn compute_period_summary(
        &self,
        period: &ReportingPeriod,
        tech_id: Option<TechnicianId>,
    ) -> PeriodSummary {
        let mut touched: BTreeMap<TechnicianId, BTreeSet<JobId>> = BTreeMap::new();
        for entry in self.source.entries_in_period(period) {
            if !entry.status.is_payable() {
                continue;
            }
            let Some(entry_tech) = entry.tech_id else {
                continue;
            };
            if tech_id.is_some_and(|wanted| wanted != entry_tech) {
                continue;
            }
            touched.entry(entry_tech).or_default().insert(entry.job_id);
        }

        let mut breakdowns: BTreeMap<JobId, Option<JobPayBreakdown>> = BTreeMap::new();
        let mut sections = Vec::with_capacity(touched.len());

        for (entry_tech, job_ids) in touched {
            let Some(technician) = self.source.technician(entry_tech) else {
                warn!(tech_id = entry_tech, "Skipping unknown technician in period report");
                continue;
            };

            let lines = job_ids
                .into_iter()
                .filter_map(|job_id| {
                    breakdowns
                        .entry(job_id)
                        .or_insert_with(|| self.compute_job_pay(job_id))
                        .as_ref()
                        .and_then(|breakdown| technician_job_line(breakdown, entry_tech))
                })
                .collect();

            sections.push(summarize_period_technician(technician, lines));
        }

        debug!(
            technicians = sections.len(),
            jobs = breakdowns.len(),
            "Computed period summary"
        );
        summarize_period(*period, sections)
    }
}
