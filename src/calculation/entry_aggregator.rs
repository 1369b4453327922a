//! Entry aggregation.
//!
//! This module groups a job's time entries by technician and sums the hours
//! and reimbursable amounts for each one. Mileage is priced per entry using
//! the rate that applied on the day the entry was worked.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    AuditStep, EntryPayDetail, MileageRateHistory, Technician, TechnicianId, TimeEntry,
};

use super::rate_resolver::resolve_mileage_rate;

/// Per-technician sums for one job, at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianAggregate {
    /// The technician.
    pub tech_id: TechnicianId,
    /// Display name, or `Tech #<id>` when the technician is unknown.
    pub tech_name: String,
    /// Guaranteed minimum hourly rate (zero when the technician is unknown).
    pub min_pay: Decimal,
    /// Total hours; unset hours count as zero.
    pub hours: Decimal,
    /// Total miles.
    pub mileage: Decimal,
    /// Sum of per-entry `mileage × rate`.
    pub mileage_pay: Decimal,
    /// Total per diem.
    pub per_diem: Decimal,
    /// Total personal expenses.
    pub personal_expenses: Decimal,
    /// The entries with their resolved rates, in input order.
    pub entries: Vec<EntryPayDetail>,
}

impl TechnicianAggregate {
    fn new(tech_id: TechnicianId, technician: Option<&Technician>) -> Self {
        Self {
            tech_id,
            tech_name: technician
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("Tech #{}", tech_id)),
            min_pay: technician.map(|t| t.min_pay).unwrap_or(Decimal::ZERO),
            hours: Decimal::ZERO,
            mileage: Decimal::ZERO,
            mileage_pay: Decimal::ZERO,
            per_diem: Decimal::ZERO,
            personal_expenses: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    /// `hours × min_pay`: the least this technician's base pay may be.
    pub fn minimum_floor(&self) -> Decimal {
        self.hours * self.min_pay
    }
}

/// The result of aggregating a job's entries.
#[derive(Debug, Clone)]
pub struct EntryAggregation {
    /// One aggregate per technician, ordered by technician id.
    pub technicians: Vec<TechnicianAggregate>,
    /// Entries skipped because no technician is assigned.
    pub unassigned_entries: usize,
    /// Technicians referenced by entries but missing from the lookup.
    pub unknown_technicians: Vec<TechnicianId>,
    /// Distinct dates priced with the fallback mileage rate, ascending.
    pub missing_rate_dates: Vec<NaiveDate>,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Groups entries by technician and sums hours and reimbursements.
///
/// Entries without a technician are work not yet attributable to anyone and
/// are left out entirely. A technician referenced by an entry but missing
/// from `lookup` is still paid, at a zero minimum rate.
///
/// # Arguments
///
/// * `entries` - The job's time entries
/// * `lookup` - Finds a technician by id
/// * `history` - Mileage rate history
/// * `fallback_rate` - Rate used for dates no history window covers
/// * `step_number` - The step number for audit trail sequencing
pub fn aggregate_entries<'a, I, F>(
    entries: I,
    lookup: F,
    history: &MileageRateHistory,
    fallback_rate: Decimal,
    step_number: u32,
) -> EntryAggregation
where
    I: IntoIterator<Item = &'a TimeEntry>,
    F: Fn(TechnicianId) -> Option<&'a Technician>,
{
    let mut grouped: BTreeMap<TechnicianId, TechnicianAggregate> = BTreeMap::new();
    let mut unknown_technicians = Vec::new();
    let mut missing_rate_dates = Vec::new();
    let mut unassigned_entries = 0;
    let mut entry_count = 0;

    for entry in entries {
        let Some(tech_id) = entry.tech_id else {
            unassigned_entries += 1;
            continue;
        };
        entry_count += 1;

        let aggregate = grouped.entry(tech_id).or_insert_with(|| {
            let technician = lookup(tech_id);
            if technician.is_none() {
                unknown_technicians.push(tech_id);
            }
            TechnicianAggregate::new(tech_id, technician)
        });

        let rate = resolve_mileage_rate(history, entry.date_worked, fallback_rate);
        if rate.used_fallback && !missing_rate_dates.contains(&entry.date_worked) {
            missing_rate_dates.push(entry.date_worked);
        }
        let mileage_pay = entry.mileage * rate.rate;

        aggregate.hours += entry.hours_or_zero();
        aggregate.mileage += entry.mileage;
        aggregate.mileage_pay += mileage_pay;
        aggregate.per_diem += entry.per_diem;
        aggregate.personal_expenses += entry.personal_expenses;
        aggregate.entries.push(EntryPayDetail {
            entry: entry.clone(),
            mileage_rate: rate.rate,
            mileage_pay,
        });
    }

    missing_rate_dates.sort();
    let technicians: Vec<TechnicianAggregate> = grouped.into_values().collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "entry_aggregation".to_string(),
        rule_name: "Entry Aggregation".to_string(),
        input: serde_json::json!({
            "assigned_entries": entry_count,
            "unassigned_entries": unassigned_entries
        }),
        output: serde_json::json!({
            "technician_count": technicians.len(),
            "missing_rate_dates": missing_rate_dates
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>(),
            "unknown_technicians": unknown_technicians
        }),
        reasoning: format!(
            "{} entries grouped across {} technician(s); {} unassigned entries excluded",
            entry_count,
            technicians.len(),
            unassigned_entries
        ),
    };

    EntryAggregation {
        technicians,
        unassigned_entries,
        unknown_technicians,
        missing_rate_dates,
        audit_step,
    }
}
