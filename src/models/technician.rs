//! Technician model and related types.
//!
//! This module defines the Technician struct and TechnicianStatus enum
//! for representing the people whose pay the engine computes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Identifier of a technician.
pub type TechnicianId = u64;

/// Whether a technician is currently working for the company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    /// Currently taking jobs.
    #[default]
    Active,
    /// No longer taking jobs. Historical entries still pay out.
    Inactive,
}

/// Represents a technician who logs time against jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    /// Unique identifier for the technician.
    pub id: TechnicianId,
    /// Display name.
    pub name: String,
    /// Guaranteed minimum hourly rate. This is a floor, not a negotiated rate.
    #[serde(default)]
    pub min_pay: Decimal,
    /// Employment status.
    #[serde(default)]
    pub status: TechnicianStatus,
}

impl Technician {
    /// Returns true if the technician is active.
    ///
    /// # Examples
    ///
    /// ```
    /// use tech_pay_engine::models::{Technician, TechnicianStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let tech = Technician {
    ///     id: 1,
    ///     name: "Alex Rivera".to_string(),
    ///     min_pay: Decimal::new(2000, 2),
    ///     status: TechnicianStatus::Active,
    /// };
    /// assert!(tech.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == TechnicianStatus::Active
    }

    /// Checks that the minimum pay is not negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.min_pay < Decimal::ZERO {
            return Err(EngineError::InvalidTechnician {
                tech_id: self.id,
                message: format!("min_pay cannot be negative (got {})", self.min_pay),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_technician(status: TechnicianStatus) -> Technician {
        Technician {
            id: 1,
            name: "Alex Rivera".to_string(),
            min_pay: Decimal::new(2000, 2),
            status,
        }
    }

    #[test]
    fn test_deserialize_technician() {
        let json = r#"{
            "id": 3,
            "name": "Sam Okafor",
            "min_pay": "27.50",
            "status": "inactive"
        }"#;

        let tech: Technician = serde_json::from_str(json).unwrap();
        assert_eq!(tech.id, 3);
        assert_eq!(tech.name, "Sam Okafor");
        assert_eq!(tech.min_pay, Decimal::new(2750, 2));
        assert_eq!(tech.status, TechnicianStatus::Inactive);
    }

    #[test]
    fn test_deserialize_defaults_min_pay_and_status() {
        let json = r#"{ "id": 4, "name": "New Hire" }"#;

        let tech: Technician = serde_json::from_str(json).unwrap();
        assert_eq!(tech.min_pay, Decimal::ZERO);
        assert_eq!(tech.status, TechnicianStatus::Active);
    }

    #[test]
    fn test_is_active() {
        assert!(create_test_technician(TechnicianStatus::Active).is_active());
        assert!(!create_test_technician(TechnicianStatus::Inactive).is_active());
    }

    #[test]
    fn test_validate_accepts_zero_min_pay() {
        let mut tech = create_test_technician(TechnicianStatus::Active);
        tech.min_pay = Decimal::ZERO;
        assert!(tech.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_min_pay() {
        let mut tech = create_test_technician(TechnicianStatus::Active);
        tech.min_pay = Decimal::new(-100, 2);

        match tech.validate() {
            Err(EngineError::InvalidTechnician { tech_id, message }) => {
                assert_eq!(tech_id, 1);
                assert!(message.contains("min_pay"));
            }
            other => panic!("Expected InvalidTechnician error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TechnicianStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&TechnicianStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }
}
