//! Deduction aggregation.
//!
//! Reimbursements are paid back to technicians in full, so they come off the
//! job net before anything is split.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::entry_aggregator::TechnicianAggregate;

/// Reimbursements summed across every technician on a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deductions {
    /// Total mileage pay.
    pub total_mileage_pay: Decimal,
    /// Total per diem.
    pub total_per_diem: Decimal,
    /// Total personal expenses.
    pub total_personal_expenses: Decimal,
    /// Sum of the three.
    pub total: Decimal,
}

/// The result of aggregating deductions, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// The summed deductions.
    pub deductions: Deductions,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Sums mileage pay, per diem and personal expenses across technicians.
pub fn aggregate_deductions(
    aggregates: &[TechnicianAggregate],
    step_number: u32,
) -> DeductionsResult {
    let mut deductions = Deductions::default();
    for aggregate in aggregates {
        deductions.total_mileage_pay += aggregate.mileage_pay;
        deductions.total_per_diem += aggregate.per_diem;
        deductions.total_personal_expenses += aggregate.personal_expenses;
    }
    deductions.total = deductions.total_mileage_pay
        + deductions.total_per_diem
        + deductions.total_personal_expenses;

    let audit_step = AuditStep {
        step_number,
        rule_id: "deductions".to_string(),
        rule_name: "Reimbursement Deductions".to_string(),
        input: serde_json::json!({
            "technician_count": aggregates.len()
        }),
        output: serde_json::json!({
            "total_mileage_pay": deductions.total_mileage_pay.to_string(),
            "total_per_diem": deductions.total_per_diem.to_string(),
            "total_personal_expenses": deductions.total_personal_expenses.to_string(),
            "total_deductions": deductions.total.to_string()
        }),
        reasoning: format!(
            "${} mileage + ${} per diem + ${} personal expenses = ${}",
            deductions.total_mileage_pay,
            deductions.total_per_diem,
            deductions.total_personal_expenses,
            deductions.total
        ),
    };

    DeductionsResult {
        deductions,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn aggregate(tech_id: u64, mileage_pay: &str, per_diem: &str, expenses: &str) -> TechnicianAggregate {
        TechnicianAggregate {
            tech_id,
            tech_name: format!("Tech #{}", tech_id),
            min_pay: dec("20"),
            hours: dec("8"),
            mileage: Decimal::ZERO,
            mileage_pay: dec(mileage_pay),
            per_diem: dec(per_diem),
            personal_expenses: dec(expenses),
            entries: vec![],
        }
    }

    #[test]
    fn test_sums_across_technicians() {
        let aggregates = vec![
            aggregate(1, "70.00", "45.00", "12.50"),
            aggregate(2, "33.50", "0", "7.25"),
        ];

        let result = aggregate_deductions(&aggregates, 3);

        assert_eq!(result.deductions.total_mileage_pay, dec("103.50"));
        assert_eq!(result.deductions.total_per_diem, dec("45.00"));
        assert_eq!(result.deductions.total_personal_expenses, dec("19.75"));
        assert_eq!(result.deductions.total, dec("168.25"));
    }

    #[test]
    fn test_no_technicians_means_no_deductions() {
        let result = aggregate_deductions(&[], 3);
        assert_eq!(result.deductions, Deductions::default());
        assert_eq!(result.audit_step.output["total_deductions"], "0");
    }
}
