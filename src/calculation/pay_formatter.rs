//! Output formatting and breakdown assembly.
//!
//! Everything upstream works at full decimal precision. This module is the
//! only place values are rounded: money, hours and rates to two places and
//! weights to four, always rounding half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditTrace, EntryPayDetail, Job, JobPayBreakdown, PayTotals, TechnicianPay};

use super::entry_aggregator::TechnicianAggregate;
use super::pool_allocator::{PoolAllocation, TechnicianAllocation};

/// Decimal places for money, hours and rates.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places for pool weights.
pub const WEIGHT_DECIMAL_PLACES: u32 = 4;

/// Rounds half-up to cents, always carrying exactly two decimal places.
///
/// # Examples
///
/// ```
/// use tech_pay_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2.345").unwrap()).to_string(), "2.35");
/// assert_eq!(round_money(Decimal::from_str("-2.345").unwrap()).to_string(), "-2.35");
/// assert_eq!(round_money(Decimal::from(7)).to_string(), "7.00");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    round_to(value, MONEY_DECIMAL_PLACES)
}

/// Rounds half-up to four places.
pub fn round_weight(value: Decimal) -> Decimal {
    round_to(value, WEIGHT_DECIMAL_PLACES)
}

fn round_to(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

/// Job-level figures computed before allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobFigures {
    /// Billing minus expenses and commissions.
    pub job_net: Decimal,
    /// Sum of reimbursements across technicians.
    pub total_deductions: Decimal,
    /// The pool split among technicians.
    pub tech_pool: Decimal,
}

/// Builds one technician's displayed pay from their aggregate and allocation.
///
/// Each component is rounded on its own. `total_pay` is rounded once from
/// the full-precision sum, so it can differ by a cent from the sum of the
/// displayed components.
pub fn format_technician_pay(
    aggregate: &TechnicianAggregate,
    allocation: &TechnicianAllocation,
) -> TechnicianPay {
    let base_pay = round_money(allocation.base_pay);
    let mileage_pay = round_money(aggregate.mileage_pay);
    let per_diem = round_money(aggregate.per_diem);
    let personal_expenses = round_money(aggregate.personal_expenses);

    TechnicianPay {
        tech_id: aggregate.tech_id,
        tech_name: aggregate.tech_name.clone(),
        hours: round_money(aggregate.hours),
        min_pay: round_money(aggregate.min_pay),
        weight: round_weight(allocation.weight),
        base_pay,
        mileage: aggregate.mileage,
        mileage_pay,
        per_diem,
        personal_expenses,
        total_pay: round_money(
            allocation.base_pay
                + aggregate.mileage_pay
                + aggregate.per_diem
                + aggregate.personal_expenses,
        ),
        effective_rate: round_money(allocation.effective_rate),
        using_minimum: allocation.using_minimum,
        entries: aggregate
            .entries
            .iter()
            .map(|detail| EntryPayDetail {
                entry: detail.entry.clone(),
                mileage_rate: detail.mileage_rate,
                mileage_pay: round_money(detail.mileage_pay),
            })
            .collect(),
    }
}

/// Sums the unrounded figures across technicians and rounds the totals.
pub fn format_job_totals(
    aggregates: &[TechnicianAggregate],
    allocations: &[TechnicianAllocation],
) -> PayTotals {
    let mut totals = PayTotals::default();
    for (aggregate, allocation) in aggregates.iter().zip(allocations) {
        totals.total_hours += aggregate.hours;
        totals.total_base_pay += allocation.base_pay;
        totals.total_mileage_pay += aggregate.mileage_pay;
        totals.total_per_diem += aggregate.per_diem;
        totals.total_personal_expenses += aggregate.personal_expenses;
        totals.total_pay += allocation.base_pay
            + aggregate.mileage_pay
            + aggregate.per_diem
            + aggregate.personal_expenses;
    }

    PayTotals {
        total_hours: round_money(totals.total_hours),
        total_base_pay: round_money(totals.total_base_pay),
        total_mileage_pay: round_money(totals.total_mileage_pay),
        total_per_diem: round_money(totals.total_per_diem),
        total_personal_expenses: round_money(totals.total_personal_expenses),
        total_pay: round_money(totals.total_pay),
    }
}

/// Assembles the final breakdown for a job.
///
/// `aggregates` and `allocation.allocations` must line up index for index,
/// which is how [`super::allocate_pool`] returns them.
pub fn format_breakdown(
    job: &Job,
    figures: JobFigures,
    aggregates: &[TechnicianAggregate],
    allocation: &PoolAllocation,
    audit_trace: AuditTrace,
) -> JobPayBreakdown {
    let technicians = aggregates
        .iter()
        .zip(&allocation.allocations)
        .map(|(aggregate, alloc)| format_technician_pay(aggregate, alloc))
        .collect();

    JobPayBreakdown {
        job: job.clone(),
        job_net: round_money(figures.job_net),
        tech_pool: round_money(figures.tech_pool),
        total_deductions: round_money(figures.total_deductions),
        floor_excess: round_money(allocation.floor_excess),
        technicians,
        totals: format_job_totals(aggregates, &allocation.allocations),
        audit_trace,
    }
}
