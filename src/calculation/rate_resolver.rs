//! Mileage rate resolution.
//!
//! This module looks up the reimbursement rate that applied on the day an
//! entry was worked.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{MileageRate, MileageRateHistory};

/// The result of resolving a mileage rate for a date.
#[derive(Debug, Clone, PartialEq)]
pub struct MileageRateLookup {
    /// The date that was looked up.
    pub date: NaiveDate,
    /// The rate to apply.
    pub rate: Decimal,
    /// The interval the rate came from, if one covered the date.
    pub interval: Option<MileageRate>,
    /// True when no interval covered the date and the fallback was used.
    pub used_fallback: bool,
}

/// Resolves the mileage rate effective on `date`.
///
/// The history is kept newest first, so the first window containing `date`
/// is the most recent applicable rate regardless of the order the rates were
/// originally supplied in. A date outside every window is a configuration
/// gap rather than an error: `fallback` is returned with `used_fallback` set
/// so the caller can report it.
///
/// # Examples
///
/// ```
/// use tech_pay_engine::calculation::resolve_mileage_rate;
/// use tech_pay_engine::models::{MileageRate, MileageRateHistory};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let history = MileageRateHistory::new(vec![MileageRate {
///     effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: None,
///     rate_per_mile: Decimal::new(70, 2),
///     description: None,
/// }])
/// .unwrap();
///
/// let hit = resolve_mileage_rate(&history, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), Decimal::ZERO);
/// assert_eq!(hit.rate, Decimal::new(70, 2));
/// assert!(!hit.used_fallback);
///
/// let miss = resolve_mileage_rate(&history, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), Decimal::ZERO);
/// assert_eq!(miss.rate, Decimal::ZERO);
/// assert!(miss.used_fallback);
/// ```
pub fn resolve_mileage_rate(
    history: &MileageRateHistory,
    date: NaiveDate,
    fallback: Decimal,
) -> MileageRateLookup {
    match history.find(date) {
        Some(interval) => MileageRateLookup {
            date,
            rate: interval.rate_per_mile,
            interval: Some(interval.clone()),
            used_fallback: false,
        },
        None => MileageRateLookup {
            date,
            rate: fallback,
            interval: None,
            used_fallback: true,
        },
    }
}
