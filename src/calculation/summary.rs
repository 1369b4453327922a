//! Summary aggregation.
//!
//! Summaries never redistribute anything across jobs. They pick a
//! technician's line out of each job's breakdown and add up the figures as
//! displayed, so a summary total always equals the sum of the lines above it.

use chrono::NaiveDate;

use crate::models::{
    JobPayBreakdown, PayTotals, PeriodSummary, PeriodTechnicianSummary, ReportingPeriod,
    Technician, TechnicianId, TechnicianJobPay, TechnicianPay, TechnicianSummary,
};

use super::pay_formatter::round_money;

/// Distinct dates a technician worked, ascending.
pub fn entry_dates(pay: &TechnicianPay) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = pay.entries.iter().map(|d| d.entry.date_worked).collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Formats sorted dates as a single date or a `first - last` range.
///
/// # Examples
///
/// ```
/// use tech_pay_engine::calculation::date_display;
/// use chrono::NaiveDate;
///
/// let first = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let last = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
///
/// assert_eq!(date_display(&[]), None);
/// assert_eq!(date_display(&[first]).as_deref(), Some("2025-03-03"));
/// assert_eq!(date_display(&[first, last]).as_deref(), Some("2025-03-03 - 2025-03-05"));
/// ```
pub fn date_display(dates: &[NaiveDate]) -> Option<String> {
    match dates {
        [] => None,
        [only] => Some(only.to_string()),
        [first, .., last] => Some(format!("{} - {}", first, last)),
    }
}

/// Extracts one technician's line from a job breakdown.
///
/// Returns `None` if the technician has no share of the job.
pub fn technician_job_line(
    breakdown: &JobPayBreakdown,
    tech_id: TechnicianId,
) -> Option<TechnicianJobPay> {
    let tech_pay = breakdown.technician(tech_id)?.clone();
    let entry_dates = entry_dates(&tech_pay);

    Some(TechnicianJobPay {
        job: breakdown.job.clone(),
        date_display: date_display(&entry_dates),
        entry_dates,
        tech_pay,
    })
}

/// Adds up the displayed figures of each line.
pub fn sum_job_lines(lines: &[TechnicianJobPay]) -> PayTotals {
    let mut totals = PayTotals::default();
    for line in lines {
        totals.add(&line.tech_pay);
    }
    normalize_totals(totals)
}

fn normalize_totals(totals: PayTotals) -> PayTotals {
    // Inputs are already cents; this only pins the scale so empty sums read "0.00".
    PayTotals {
        total_hours: round_money(totals.total_hours),
        total_base_pay: round_money(totals.total_base_pay),
        total_mileage_pay: round_money(totals.total_mileage_pay),
        total_per_diem: round_money(totals.total_per_diem),
        total_personal_expenses: round_money(totals.total_personal_expenses),
        total_pay: round_money(totals.total_pay),
    }
}

/// Builds a technician summary from the breakdowns of the jobs they touched.
///
/// Lines are ordered by job id. Breakdowns the technician has no share of
/// are skipped.
pub fn summarize_technician(
    tech_id: TechnicianId,
    period: ReportingPeriod,
    breakdowns: &[JobPayBreakdown],
) -> TechnicianSummary {
    let mut jobs: Vec<TechnicianJobPay> = breakdowns
        .iter()
        .filter_map(|b| technician_job_line(b, tech_id))
        .collect();
    jobs.sort_by_key(|line| line.job.id);

    let totals = sum_job_lines(&jobs);
    TechnicianSummary {
        tech_id,
        period,
        jobs,
        totals,
    }
}

/// Builds one technician's section of a period summary.
///
/// Lines are ordered by the first date worked, then by job id.
pub fn summarize_period_technician(
    technician: &Technician,
    mut jobs: Vec<TechnicianJobPay>,
) -> PeriodTechnicianSummary {
    jobs.sort_by(|a, b| {
        a.entry_dates
            .first()
            .cmp(&b.entry_dates.first())
            .then(a.job.id.cmp(&b.job.id))
    });

    let totals = sum_job_lines(&jobs);
    PeriodTechnicianSummary {
        tech_id: technician.id,
        tech_name: technician.name.clone(),
        min_pay: round_money(technician.min_pay),
        jobs,
        totals,
    }
}

/// Combines technician sections into a period summary.
///
/// Sections are ordered by technician name, then id. Grand totals are the
/// sum of the section totals.
pub fn summarize_period(
    period: ReportingPeriod,
    mut technicians: Vec<PeriodTechnicianSummary>,
) -> PeriodSummary {
    technicians.sort_by(|a, b| {
        a.tech_name
            .cmp(&b.tech_name)
            .then(a.tech_id.cmp(&b.tech_id))
    });

    let mut grand_totals = PayTotals::default();
    for section in &technicians {
        grand_totals.merge(&section.totals);
    }

    PeriodSummary {
        period,
        technician_count: technicians.len(),
        grand_totals: normalize_totals(grand_totals),
        technicians,
    }
}
