//! Calculation logic for the Technician Pay Distribution Engine.
//!
//! This module contains the pay pipeline, leaves first: mileage rate
//! resolution, entry aggregation, job net, reimbursement deductions, tech
//! pool allocation with minimum floors, output formatting, and the
//! per-technician and per-period summaries built on top of it.

mod deductions;
mod engine;
mod entry_aggregator;
mod job_net;
mod pay_formatter;
mod pool_allocator;
mod rate_resolver;
mod summary;

pub use deductions::{Deductions, DeductionsResult, aggregate_deductions};
pub use engine::{
    PayEngine, WARNING_MILEAGE_RATE_MISSING, WARNING_MINIMUM_FLOOR_EXCESS, WARNING_NEGATIVE_POOL,
    WARNING_UNKNOWN_TECHNICIAN, calculate_job_pay,
};
pub use entry_aggregator::{EntryAggregation, TechnicianAggregate, aggregate_entries};
pub use job_net::{JobNetResult, calculate_job_net};
pub use pay_formatter::{
    JobFigures, MONEY_DECIMAL_PLACES, WEIGHT_DECIMAL_PLACES, format_breakdown, format_job_totals,
    format_technician_pay, round_money, round_weight,
};
pub use pool_allocator::{
    PoolAllocation, TECH_POOL_DIVISOR, TechPoolResult, TechnicianAllocation, allocate_pool,
    calculate_tech_pool,
};
pub use rate_resolver::{MileageRateLookup, resolve_mileage_rate};
pub use summary::{
    date_display, entry_dates, sum_job_lines, summarize_period, summarize_period_technician,
    summarize_technician, technician_job_line,
};
