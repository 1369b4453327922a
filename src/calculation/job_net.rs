//! Job net calculation.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Job};

/// The result of a job net calculation, including the net and audit step.
#[derive(Debug, Clone)]
pub struct JobNetResult {
    /// Billing amount minus expenses and commissions.
    pub job_net: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates what a job earned after expenses and commissions.
///
/// Missing money fields count as zero. The net is not floored here: a job
/// that lost money reports a negative net, and the pool calculation decides
/// what that means for the technicians.
///
/// # Examples
///
/// ```
/// use tech_pay_engine::calculation::calculate_job_net;
/// use tech_pay_engine::models::{Job, JobStatus};
/// use rust_decimal::Decimal;
///
/// let job = Job {
///     id: 1,
///     ticket_number: None,
///     description: "Panel upgrade".to_string(),
///     client_name: None,
///     billing_amount: Some(Decimal::new(100000, 2)),
///     expenses: Some(Decimal::new(10000, 2)),
///     commissions: None,
///     status: JobStatus::Completed,
/// };
///
/// let result = calculate_job_net(&job, 2);
/// assert_eq!(result.job_net, Decimal::new(90000, 2));
/// ```
pub fn calculate_job_net(job: &Job, step_number: u32) -> JobNetResult {
    let billing = job.billing_amount_or_zero();
    let expenses = job.expenses_or_zero();
    let commissions = job.commissions_or_zero();
    let job_net = billing - expenses - commissions;

    let audit_step = AuditStep {
        step_number,
        rule_id: "job_net".to_string(),
        rule_name: "Job Net".to_string(),
        input: serde_json::json!({
            "billing_amount": billing.to_string(),
            "expenses": expenses.to_string(),
            "commissions": commissions.to_string()
        }),
        output: serde_json::json!({
            "job_net": job_net.to_string()
        }),
        reasoning: format!(
            "${} billed - ${} expenses - ${} commissions = ${}",
            billing, expenses, commissions, job_net
        ),
    };

    JobNetResult {
        job_net,
        audit_step,
    }
}
