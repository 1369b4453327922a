//! Tech pool calculation and allocation.
//!
//! After reimbursements come off the job net, half of what remains is the
//! tech pool. The pool is split among the technicians on the job in
//! proportion to what their hours would cost at their minimum rates, and
//! each share is then raised to that technician's minimum floor if needed.
//!
//! Floors are applied per technician with no rebalancing. If floors push the
//! total above the pool, the overshoot is reported as `floor_excess` rather
//! than being clawed back from anyone else.

use rust_decimal::Decimal;

use crate::models::{AuditStep, TechnicianId};

use super::entry_aggregator::TechnicianAggregate;

/// Divisor applied to the post-deduction net to get the technicians' pool.
pub const TECH_POOL_DIVISOR: Decimal = Decimal::TWO;

/// The result of a tech pool calculation.
#[derive(Debug, Clone)]
pub struct TechPoolResult {
    /// The pool available for base pay, never negative.
    pub tech_pool: Decimal,
    /// True when the raw pool was negative and clamped to zero.
    pub clamped: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the tech pool: `max(0, (job_net - total_deductions) / 2)`.
///
/// # Examples
///
/// ```
/// use tech_pay_engine::calculation::calculate_tech_pool;
/// use rust_decimal::Decimal;
///
/// let result = calculate_tech_pool(Decimal::new(90000, 2), Decimal::ZERO, 4);
/// assert_eq!(result.tech_pool, Decimal::new(45000, 2));
///
/// let result = calculate_tech_pool(Decimal::new(10000, 2), Decimal::new(30000, 2), 4);
/// assert_eq!(result.tech_pool, Decimal::ZERO);
/// assert!(result.clamped);
/// ```
pub fn calculate_tech_pool(
    job_net: Decimal,
    total_deductions: Decimal,
    step_number: u32,
) -> TechPoolResult {
    let raw_pool = (job_net - total_deductions) / TECH_POOL_DIVISOR;
    let clamped = raw_pool < Decimal::ZERO;
    let tech_pool = raw_pool.max(Decimal::ZERO);

    let reasoning = if clamped {
        format!(
            "(${} - ${}) / {} = ${} is negative; pool clamped to $0",
            job_net, total_deductions, TECH_POOL_DIVISOR, raw_pool
        )
    } else {
        format!(
            "(${} - ${}) / {} = ${}",
            job_net, total_deductions, TECH_POOL_DIVISOR, tech_pool
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tech_pool".to_string(),
        rule_name: "Tech Pool".to_string(),
        input: serde_json::json!({
            "job_net": job_net.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        output: serde_json::json!({
            "raw_pool": raw_pool.to_string(),
            "tech_pool": tech_pool.to_string(),
            "clamped": clamped
        }),
        reasoning,
    };

    TechPoolResult {
        tech_pool,
        clamped,
        audit_step,
    }
}

/// One technician's unrounded share of the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianAllocation {
    /// The technician.
    pub tech_id: TechnicianId,
    /// Share of the pool.
    pub weight: Decimal,
    /// Base pay after the minimum floor.
    pub base_pay: Decimal,
    /// Base pay per hour, or the minimum rate when no hours were logged.
    pub effective_rate: Decimal,
    /// True when the floor raised the base pay.
    pub using_minimum: bool,
    /// `hours × min_pay`.
    pub minimum_floor: Decimal,
}

/// The result of splitting the pool across a job's technicians.
#[derive(Debug, Clone, Default)]
pub struct PoolAllocation {
    /// One allocation per technician, in the order they were supplied.
    pub allocations: Vec<TechnicianAllocation>,
    /// Sum of every base pay.
    pub total_base_pay: Decimal,
    /// `max(0, total_base_pay - tech_pool)`.
    pub floor_excess: Decimal,
    /// One audit step per technician.
    pub audit_steps: Vec<AuditStep>,
}

/// Splits `tech_pool` across the technicians.
///
/// With one technician the whole pool is theirs, unless it works out below
/// their minimum rate, in which case they are paid `hours × min_pay`. With
/// several, each gets `pool × min_pay × hours / Σ(min_pay × hours)`, raised
/// independently to their own floor. When nobody logged any hours there is
/// no labour to pay and every base pay is zero.
///
/// # Arguments
///
/// * `tech_pool` - The pool from [`calculate_tech_pool`]
/// * `aggregates` - The job's technicians from the entry aggregator
/// * `step_number` - The step number of the first allocation step
pub fn allocate_pool(
    tech_pool: Decimal,
    aggregates: &[TechnicianAggregate],
    step_number: u32,
) -> PoolAllocation {
    let total_hours: Decimal = aggregates.iter().map(|a| a.hours).sum();

    let allocations: Vec<TechnicianAllocation> = if total_hours.is_zero() {
        let weight = if aggregates.len() == 1 {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        aggregates
            .iter()
            .map(|a| unpaid_allocation(a, weight))
            .collect()
    } else if let [only] = aggregates {
        vec![allocate_single(tech_pool, only)]
    } else {
        allocate_weighted(tech_pool, aggregates)
    };

    let total_base_pay: Decimal = allocations.iter().map(|a| a.base_pay).sum();
    let floor_excess = (total_base_pay - tech_pool).max(Decimal::ZERO);

    let audit_steps = aggregates
        .iter()
        .zip(&allocations)
        .zip(step_number..)
        .map(|((aggregate, allocation), number)| {
            allocation_audit_step(tech_pool, aggregate, allocation, number)
        })
        .collect();

    PoolAllocation {
        allocations,
        total_base_pay,
        floor_excess,
        audit_steps,
    }
}

fn unpaid_allocation(aggregate: &TechnicianAggregate, weight: Decimal) -> TechnicianAllocation {
    TechnicianAllocation {
        tech_id: aggregate.tech_id,
        weight,
        base_pay: Decimal::ZERO,
        effective_rate: aggregate.min_pay,
        using_minimum: false,
        minimum_floor: Decimal::ZERO,
    }
}

fn allocate_single(tech_pool: Decimal, aggregate: &TechnicianAggregate) -> TechnicianAllocation {
    let minimum_floor = aggregate.minimum_floor();
    let calculated_rate = tech_pool / aggregate.hours;

    if calculated_rate < aggregate.min_pay {
        TechnicianAllocation {
            tech_id: aggregate.tech_id,
            weight: Decimal::ONE,
            base_pay: minimum_floor,
            effective_rate: aggregate.min_pay,
            using_minimum: true,
            minimum_floor,
        }
    } else {
        TechnicianAllocation {
            tech_id: aggregate.tech_id,
            weight: Decimal::ONE,
            base_pay: tech_pool,
            effective_rate: calculated_rate,
            using_minimum: false,
            minimum_floor,
        }
    }
}

fn allocate_weighted(
    tech_pool: Decimal,
    aggregates: &[TechnicianAggregate],
) -> Vec<TechnicianAllocation> {
    let denominator: Decimal = aggregates.iter().map(|a| a.minimum_floor()).sum();
    let count = Decimal::from(aggregates.len());

    aggregates
        .iter()
        .map(|aggregate| {
            let contribution = aggregate.minimum_floor();
            // Multiply before dividing so the provisional share keeps full precision.
            let (weight, provisional) = if denominator.is_zero() {
                (Decimal::ONE / count, tech_pool / count)
            } else {
                (
                    contribution / denominator,
                    tech_pool * contribution / denominator,
                )
            };

            let using_minimum = provisional < contribution;
            let base_pay = if using_minimum {
                contribution
            } else {
                provisional
            };
            let effective_rate = if aggregate.hours.is_zero() {
                aggregate.min_pay
            } else {
                base_pay / aggregate.hours
            };

            TechnicianAllocation {
                tech_id: aggregate.tech_id,
                weight,
                base_pay,
                effective_rate,
                using_minimum,
                minimum_floor: contribution,
            }
        })
        .collect()
}

fn allocation_audit_step(
    tech_pool: Decimal,
    aggregate: &TechnicianAggregate,
    allocation: &TechnicianAllocation,
    step_number: u32,
) -> AuditStep {
    let reasoning = if allocation.using_minimum {
        format!(
            "Share of ${} pool fell below the {} hrs x ${} floor; base pay raised to ${}",
            tech_pool, aggregate.hours, aggregate.min_pay, allocation.base_pay
        )
    } else {
        format!(
            "{} x ${} pool = ${} base pay (floor ${})",
            allocation.weight, tech_pool, allocation.base_pay, allocation.minimum_floor
        )
    };

    AuditStep {
        step_number,
        rule_id: "pool_allocation".to_string(),
        rule_name: "Pool Allocation".to_string(),
        input: serde_json::json!({
            "tech_id": aggregate.tech_id,
            "hours": aggregate.hours.to_string(),
            "min_pay": aggregate.min_pay.to_string(),
            "tech_pool": tech_pool.to_string()
        }),
        output: serde_json::json!({
            "weight": allocation.weight.to_string(),
            "minimum_floor": allocation.minimum_floor.to_string(),
            "base_pay": allocation.base_pay.to_string(),
            "effective_rate": allocation.effective_rate.to_string(),
            "using_minimum": allocation.using_minimum
        }),
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::RoundingStrategy;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cents(d: Decimal) -> Decimal {
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    fn tech(tech_id: u64, min_pay: &str, hours: &str) -> TechnicianAggregate {
        TechnicianAggregate {
            tech_id,
            tech_name: format!("Tech #{}", tech_id),
            min_pay: dec(min_pay),
            hours: dec(hours),
            mileage: Decimal::ZERO,
            mileage_pay: Decimal::ZERO,
            per_diem: Decimal::ZERO,
            personal_expenses: Decimal::ZERO,
            entries: vec![],
        }
    }

    // ==========================================================================
    // Tech pool
    // ==========================================================================

    #[test]
    fn test_pool_is_half_of_net_after_deductions() {
        let result = calculate_tech_pool(dec("900.00"), dec("100.00"), 4);
        assert_eq!(result.tech_pool, dec("400.00"));
        assert!(!result.clamped);
        assert_eq!(result.audit_step.rule_id, "tech_pool");
    }

    #[test]
    fn test_negative_pool_is_clamped() {
        let result = calculate_tech_pool(dec("-50.00"), dec("20.00"), 4);
        assert_eq!(result.tech_pool, Decimal::ZERO);
        assert!(result.clamped);
        let raw = result.audit_step.output["raw_pool"].as_str().unwrap();
        assert_eq!(dec(raw), dec("-35"));
    }

    #[test]
    fn test_pool_of_exactly_zero_is_not_clamped() {
        let result = calculate_tech_pool(dec("100.00"), dec("100.00"), 4);
        assert_eq!(result.tech_pool, Decimal::ZERO);
        assert!(!result.clamped);
    }

    // ==========================================================================
    // Single technician
    // ==========================================================================

    #[test]
    fn test_single_tech_receives_entire_pool() {
        let result = allocate_pool(dec("450.00"), &[tech(1, "20.00", "10")], 5);
        let alloc = &result.allocations[0];

        assert_eq!(alloc.weight, Decimal::ONE);
        assert_eq!(alloc.base_pay, dec("450.00"));
        assert_eq!(alloc.effective_rate, dec("45"));
        assert!(!alloc.using_minimum);
        assert_eq!(result.floor_excess, Decimal::ZERO);
    }

    #[test]
    fn test_single_tech_below_minimum_is_floored() {
        let result = allocate_pool(dec("100.00"), &[tech(1, "25.00", "8")], 5);
        let alloc = &result.allocations[0];

        assert!(alloc.using_minimum);
        assert_eq!(alloc.base_pay, dec("200.00"));
        assert_eq!(alloc.effective_rate, dec("25.00"));
        assert_eq!(result.floor_excess, dec("100.00"));
    }

    #[test]
    fn test_single_tech_exactly_at_minimum_is_not_floored() {
        let result = allocate_pool(dec("200.00"), &[tech(1, "25.00", "8")], 5);
        assert!(!result.allocations[0].using_minimum);
        assert_eq!(result.allocations[0].base_pay, dec("200.00"));
    }

    #[test]
    fn test_single_tech_with_zero_hours_gets_nothing() {
        let result = allocate_pool(dec("450.00"), &[tech(1, "20.00", "0")], 5);
        let alloc = &result.allocations[0];

        assert_eq!(alloc.base_pay, Decimal::ZERO);
        assert_eq!(alloc.effective_rate, dec("20.00"));
        assert_eq!(alloc.weight, Decimal::ONE);
        assert!(!alloc.using_minimum);
    }

    // ==========================================================================
    // Multiple technicians
    // ==========================================================================

    #[test]
    fn test_weighted_split_without_floors() {
        let techs = [tech(1, "20.00", "10"), tech(2, "30.00", "5")];
        let result = allocate_pool(dec("450.00"), &techs, 5);

        let a = &result.allocations[0];
        let b = &result.allocations[1];
        assert_eq!(cents(a.base_pay), dec("257.14"));
        assert_eq!(cents(b.base_pay), dec("192.86"));
        assert!(!a.using_minimum);
        assert!(!b.using_minimum);
        assert_eq!(a.weight.round_dp(4), dec("0.5714"));
        assert_eq!(b.weight.round_dp(4), dec("0.4286"));
        assert_eq!(cents(result.total_base_pay), dec("450.00"));
        assert_eq!(result.floor_excess, Decimal::ZERO);
    }

    #[test]
    fn test_weighted_split_with_one_short_shift() {
        let techs = [tech(1, "20.00", "10"), tech(2, "30.00", "1")];
        let result = allocate_pool(dec("450.00"), &techs, 5);

        assert_eq!(cents(result.allocations[1].base_pay), dec("58.70"));
        assert!(!result.allocations[1].using_minimum);
    }

    #[test]
    fn test_small_pool_floors_each_tech_independently() {
        // A small pool: each provisional share is 10% of the floor-weighted cost.
        let techs = [tech(1, "20.00", "10"), tech(2, "30.00", "5")];
        let result = allocate_pool(dec("35.00"), &techs, 5);

        let a = &result.allocations[0];
        let b = &result.allocations[1];
        assert!(a.using_minimum);
        assert!(b.using_minimum);
        assert_eq!(a.base_pay, dec("200.00"));
        assert_eq!(b.base_pay, dec("150.00"));
        assert_eq!(result.floor_excess, dec("315.00"));
    }

    #[test]
    fn test_floor_applies_only_where_needed() {
        // Tech 2 has no minimum so its floor never binds, and tech 3 logs
        // almost nothing against a high minimum.
        let techs = [tech(1, "20.00", "10"), tech(2, "0", "10"), tech(3, "100.00", "1")];
        let result = allocate_pool(dec("150.00"), &techs, 5);

        // Denominator = 200 + 0 + 100 = 300.
        let a = &result.allocations[0];
        let b = &result.allocations[1];
        let c = &result.allocations[2];
        assert_eq!(a.base_pay, dec("200.00"));
        assert!(a.using_minimum);
        assert_eq!(b.base_pay, Decimal::ZERO);
        assert!(!b.using_minimum);
        assert_eq!(c.base_pay, dec("100.00"));
        assert!(c.using_minimum);
        assert_eq!(result.floor_excess, dec("150.00"));
    }

    #[test]
    fn test_zero_minimums_split_evenly() {
        let techs = [tech(1, "0", "6"), tech(2, "0", "2")];
        let result = allocate_pool(dec("300.00"), &techs, 5);

        assert_eq!(result.allocations[0].base_pay, dec("150.00"));
        assert_eq!(result.allocations[1].base_pay, dec("150.00"));
        assert_eq!(result.allocations[0].effective_rate, dec("25"));
        assert_eq!(result.allocations[1].effective_rate, dec("75"));
    }

    #[test]
    fn test_tech_without_hours_in_weighted_split() {
        let techs = [tech(1, "20.00", "8"), tech(2, "30.00", "0")];
        let result = allocate_pool(dec("400.00"), &techs, 5);

        assert_eq!(result.allocations[0].base_pay, dec("400.00"));
        assert_eq!(result.allocations[1].weight, Decimal::ZERO);
        assert_eq!(result.allocations[1].base_pay, Decimal::ZERO);
        assert_eq!(result.allocations[1].effective_rate, dec("30.00"));
    }

    #[test]
    fn test_zero_total_hours_pays_no_base() {
        let techs = [tech(1, "20.00", "0"), tech(2, "30.00", "0")];
        let result = allocate_pool(dec("400.00"), &techs, 5);

        for alloc in &result.allocations {
            assert_eq!(alloc.base_pay, Decimal::ZERO);
            assert_eq!(alloc.weight, Decimal::ZERO);
        }
        assert_eq!(result.allocations[1].effective_rate, dec("30.00"));
        assert_eq!(result.total_base_pay, Decimal::ZERO);
    }

    #[test]
    fn test_empty_pool_floors_everyone() {
        let techs = [tech(1, "20.00", "2"), tech(2, "30.00", "1")];
        let result = allocate_pool(Decimal::ZERO, &techs, 5);

        assert_eq!(result.allocations[0].base_pay, dec("40.00"));
        assert_eq!(result.allocations[1].base_pay, dec("30.00"));
        assert_eq!(result.floor_excess, dec("70.00"));
    }

    #[test]
    fn test_no_technicians() {
        let result = allocate_pool(dec("100.00"), &[], 5);
        assert!(result.allocations.is_empty());
        assert_eq!(result.total_base_pay, Decimal::ZERO);
        assert!(result.audit_steps.is_empty());
    }

    #[test]
    fn test_audit_steps_are_numbered_per_technician() {
        let techs = [tech(1, "20.00", "10"), tech(2, "30.00", "5")];
        let result = allocate_pool(dec("450.00"), &techs, 5);

        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].step_number, 5);
        assert_eq!(result.audit_steps[1].step_number, 6);
        assert_eq!(result.audit_steps[1].input["tech_id"], 2);
        assert_eq!(result.audit_steps[0].rule_id, "pool_allocation");
    }
}
