//! Mileage reimbursement rate history.
//!
//! Rates change over time (typically once a year when the IRS standard rate
//! moves), so each rate carries the window in which it applies. The history
//! keeps those windows sorted newest first and refuses overlaps, which makes
//! "the rate for a date" unambiguous.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A reimbursement rate effective over an inclusive date window.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::MileageRate;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rate = MileageRate {
///     effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: None,
///     rate_per_mile: Decimal::new(70, 2),
///     description: Some("2025 IRS standard rate".to_string()),
/// };
/// assert!(rate.covers(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()));
/// assert!(!rate.covers(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageRate {
    /// First day the rate applies.
    pub effective_date: NaiveDate,
    /// Last day the rate applies; `None` means it is the current rate.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Reimbursement per mile driven.
    pub rate_per_mile: Decimal,
    /// Where the rate came from.
    #[serde(default)]
    pub description: Option<String>,
}

impl MileageRate {
    /// Returns true if `date` falls inside this rate's window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_date <= date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Returns true if the rate has no end date.
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }
}

/// A validated, non-overlapping set of mileage rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MileageRateHistory {
    /// Rates sorted by effective date, newest first.
    rates: Vec<MileageRate>,
}

impl MileageRateHistory {
    /// Builds a history from rates supplied in any order.
    ///
    /// Returns `InvalidMileageRates` if any window ends before it starts or
    /// if two windows overlap.
    pub fn new(rates: Vec<MileageRate>) -> EngineResult<Self> {
        let mut rates = rates;
        rates.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
        let history = Self { rates };
        history.validate()?;
        Ok(history)
    }

    /// Returns the rates, newest first.
    pub fn rates(&self) -> &[MileageRate] {
        &self.rates
    }

    /// Returns true if no rates are configured.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Finds the rate whose window contains `date`.
    pub fn find(&self, date: NaiveDate) -> Option<&MileageRate> {
        self.rates.iter().find(|rate| rate.covers(date))
    }

    /// Adds a new rate, closing the currently open-ended rate the day before
    /// the new one takes effect.
    ///
    /// # Example
    ///
    /// ```
    /// use tech_pay_engine::models::{MileageRate, MileageRateHistory};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut history = MileageRateHistory::new(vec![MileageRate {
    ///     effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     end_date: None,
    ///     rate_per_mile: Decimal::new(67, 2),
    ///     description: None,
    /// }])?;
    ///
    /// history.add_rate(MileageRate {
    ///     effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     end_date: None,
    ///     rate_per_mile: Decimal::new(70, 2),
    ///     description: None,
    /// })?;
    ///
    /// let closed = history.find(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();
    /// assert_eq!(closed.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    /// # Ok::<(), tech_pay_engine::error::EngineError>(())
    /// ```
    pub fn add_rate(&mut self, rate: MileageRate) -> EngineResult<()> {
        let day_before = rate
            .effective_date
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| EngineError::InvalidMileageRates {
                effective_date: rate.effective_date,
                message: "effective date is out of range".to_string(),
            })?;

        let mut rates = self.rates.clone();
        if let Some(open) = rates
            .iter_mut()
            .find(|r| r.is_open_ended() && r.effective_date < rate.effective_date)
        {
            open.end_date = Some(day_before);
        }
        rates.push(rate);

        *self = Self::new(rates)?;
        Ok(())
    }

    fn validate(&self) -> EngineResult<()> {
        for rate in &self.rates {
            if let Some(end) = rate.end_date {
                if end < rate.effective_date {
                    return Err(EngineError::InvalidMileageRates {
                        effective_date: rate.effective_date,
                        message: format!("end date {} is before the effective date", end),
                    });
                }
            }
        }

        // Sorted newest first, so each older rate must end before the newer one starts.
        for pair in self.rates.windows(2) {
            let (newer, older) = (&pair[0], &pair[1]);
            if older.covers(newer.effective_date) {
                return Err(EngineError::InvalidMileageRates {
                    effective_date: newer.effective_date,
                    message: format!(
                        "overlaps the rate effective {}",
                        older.effective_date
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rate(from: NaiveDate, to: Option<NaiveDate>, per_mile: &str) -> MileageRate {
        MileageRate {
            effective_date: from,
            end_date: to,
            rate_per_mile: dec(per_mile),
            description: None,
        }
    }

    #[test]
    fn test_new_sorts_newest_first() {
        let history = MileageRateHistory::new(vec![
            rate(date(2023, 1, 1), Some(date(2023, 12, 31)), "0.655"),
            rate(date(2025, 1, 1), None, "0.70"),
            rate(date(2024, 1, 1), Some(date(2024, 12, 31)), "0.67"),
        ])
        .unwrap();

        let effective: Vec<NaiveDate> =
            history.rates().iter().map(|r| r.effective_date).collect();
        assert_eq!(effective, vec![date(2025, 1, 1), date(2024, 1, 1), date(2023, 1, 1)]);
    }

    #[test]
    fn test_find_uses_inclusive_bounds() {
        let history = MileageRateHistory::new(vec![
            rate(date(2024, 1, 1), Some(date(2024, 12, 31)), "0.67"),
            rate(date(2025, 1, 1), None, "0.70"),
        ])
        .unwrap();

        assert_eq!(history.find(date(2024, 1, 1)).unwrap().rate_per_mile, dec("0.67"));
        assert_eq!(history.find(date(2024, 12, 31)).unwrap().rate_per_mile, dec("0.67"));
        assert_eq!(history.find(date(2025, 1, 1)).unwrap().rate_per_mile, dec("0.70"));
        assert!(history.find(date(2023, 12, 31)).is_none());
    }

    #[test]
    fn test_find_returns_none_in_gap() {
        let history = MileageRateHistory::new(vec![
            rate(date(2024, 1, 1), Some(date(2024, 6, 30)), "0.67"),
            rate(date(2024, 8, 1), None, "0.70"),
        ])
        .unwrap();

        assert!(history.find(date(2024, 7, 15)).is_none());
    }

    #[test]
    fn test_overlapping_rates_are_rejected() {
        let result = MileageRateHistory::new(vec![
            rate(date(2024, 1, 1), None, "0.67"),
            rate(date(2025, 1, 1), None, "0.70"),
        ]);

        match result {
            Err(EngineError::InvalidMileageRates { effective_date, message }) => {
                assert_eq!(effective_date, date(2025, 1, 1));
                assert!(message.contains("2024-01-01"));
            }
            other => panic!("Expected InvalidMileageRates, got {:?}", other),
        }
    }

    #[test]
    fn test_same_effective_date_is_rejected() {
        let result = MileageRateHistory::new(vec![
            rate(date(2024, 1, 1), Some(date(2024, 3, 1)), "0.67"),
            rate(date(2024, 1, 1), Some(date(2024, 2, 1)), "0.68"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let result = MileageRateHistory::new(vec![rate(
            date(2024, 6, 1),
            Some(date(2024, 5, 1)),
            "0.67",
        )]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidMileageRates { .. })
        ));
    }

    #[test]
    fn test_add_rate_closes_open_ended_rate() {
        let mut history =
            MileageRateHistory::new(vec![rate(date(2024, 1, 1), None, "0.67")]).unwrap();

        history.add_rate(rate(date(2025, 1, 1), None, "0.70")).unwrap();

        assert_eq!(history.rates().len(), 2);
        assert_eq!(history.rates()[0].rate_per_mile, dec("0.70"));
        assert!(history.rates()[0].is_open_ended());
        assert_eq!(history.rates()[1].end_date, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_add_rate_into_empty_history() {
        let mut history = MileageRateHistory::default();
        history.add_rate(rate(date(2025, 1, 1), None, "0.70")).unwrap();
        assert_eq!(history.find(date(2025, 5, 5)).unwrap().rate_per_mile, dec("0.70"));
    }

    #[test]
    fn test_add_rate_before_existing_open_rate_is_rejected() {
        let mut history =
            MileageRateHistory::new(vec![rate(date(2025, 1, 1), None, "0.70")]).unwrap();

        // The open rate starts after the new one, so nothing gets closed and
        // the new open-ended window overlaps it.
        let result = history.add_rate(rate(date(2024, 1, 1), None, "0.67"));

        assert!(result.is_err());
        assert_eq!(history.rates().len(), 1);
    }
}
