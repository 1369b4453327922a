//! Reporting period model.
//!
//! This module contains the [`ReportingPeriod`] type used to select the time
//! entries that feed technician and payroll summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A date range for summaries, inclusive at both ends.
///
/// Either bound may be omitted, in which case that side is unbounded.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::ReportingPeriod;
/// use chrono::NaiveDate;
///
/// let period = ReportingPeriod::between(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
/// );
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()));
/// assert!(ReportingPeriod::all_time().contains_date(NaiveDate::MIN));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// The first day of the period (inclusive), if bounded.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// The last day of the period (inclusive), if bounded.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ReportingPeriod {
    /// A period with no bounds.
    pub fn all_time() -> Self {
        Self::default()
    }

    /// A period bounded on both sides.
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Checks if a given date falls within this period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }

    /// Checks that the start does not come after the end.
    pub fn validate(&self) -> EngineResult<()> {
        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) if start_date > end_date => {
                Err(EngineError::InvalidPeriod {
                    start_date,
                    end_date,
                })
            }
            _ => Ok(()),
        }
    }
}
