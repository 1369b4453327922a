//! Time entry model and the entry status lifecycle.
//!
//! Time entries are immutable inputs to the pay calculation. The status
//! lifecycle lives here so the reporting layer can decide which entries are
//! eligible for payroll; the pay pipeline itself never looks at status.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{JobId, TechnicianId};

/// Identifier of a time entry.
pub type EntryId = u64;

/// Lifecycle status of a time entry.
///
/// ```text
/// draft -> submitted -> verified -> billed -> paid
///            |
///            +-> draft (rejected)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Being edited by the technician.
    #[default]
    Draft,
    /// Waiting for manager review.
    Submitted,
    /// Approved by a manager.
    Verified,
    /// Included on a client invoice.
    Billed,
    /// Paid out to the technician.
    Paid,
}

impl EntryStatus {
    /// Returns true if entries in this status are eligible for payroll.
    pub fn is_payable(self) -> bool {
        matches!(
            self,
            EntryStatus::Verified | EntryStatus::Billed | EntryStatus::Paid
        )
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Draft, EntryStatus::Submitted)
                | (EntryStatus::Submitted, EntryStatus::Verified)
                | (EntryStatus::Submitted, EntryStatus::Draft)
                | (EntryStatus::Verified, EntryStatus::Billed)
                | (EntryStatus::Billed, EntryStatus::Paid)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Submitted => "submitted",
            EntryStatus::Verified => "verified",
            EntryStatus::Billed => "billed",
            EntryStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a missing or `null` amount as zero.
fn null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Work logged by a technician against a job on a given day.
///
/// # Example
///
/// ```
/// use tech_pay_engine::models::{EntryStatus, TimeEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entry = TimeEntry {
///     id: 1,
///     job_id: 10,
///     tech_id: Some(3),
///     date_worked: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
///     hours_worked: Some(Decimal::new(65, 1)),
///     mileage: Decimal::new(42, 0),
///     personal_expenses: Decimal::ZERO,
///     per_diem: Decimal::ZERO,
///     status: EntryStatus::Verified,
///     notes: None,
/// };
/// assert_eq!(entry.hours_or_zero(), Decimal::new(65, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: EntryId,
    /// The job this entry is logged against.
    pub job_id: JobId,
    /// The technician who did the work, if assigned.
    #[serde(default)]
    pub tech_id: Option<TechnicianId>,
    /// The day the work was done. Selects the mileage rate.
    pub date_worked: NaiveDate,
    /// Hours worked, if recorded.
    #[serde(default)]
    pub hours_worked: Option<Decimal>,
    /// Miles driven.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub mileage: Decimal,
    /// Out-of-pocket expenses to reimburse.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub personal_expenses: Decimal,
    /// Per diem allowance.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub per_diem: Decimal,
    /// Lifecycle status.
    #[serde(default)]
    pub status: EntryStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TimeEntry {
    /// Hours worked, treating an unset value as zero.
    pub fn hours_or_zero(&self) -> Decimal {
        self.hours_worked.unwrap_or(Decimal::ZERO)
    }

    /// Returns true if the entry has a technician assigned.
    pub fn is_assigned(&self) -> bool {
        self.tech_id.is_some()
    }

    /// Moves the entry to `next`, enforcing the status lifecycle.
    pub fn transition_to(&mut self, next: EntryStatus) -> EngineResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidStatusTransition {
                entry_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Checks that all quantities are non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("hours_worked", self.hours_or_zero()),
            ("mileage", self.mileage),
            ("personal_expenses", self.personal_expenses),
            ("per_diem", self.per_diem),
        ];

        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(EngineError::InvalidTimeEntry {
                entry_id: self.id,
                message: format!("{} cannot be negative (got {})", field, value),
            }),
            None => Ok(()),
        }
    }
}
