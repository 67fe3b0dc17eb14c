//! Leave quota ledger functionality.
//!
//! This module mutates the two stored counters an employee's leave
//! balance is derived from. The remaining balance itself is never
//! stored; [`derive_remaining`] is the only source of that figure, and
//! a negative result is a visible warning condition rather than an
//! error.

use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, AuditWarning, derive_remaining};

/// Statutory reference for annual leave entitlement.
const LEAVE_QUOTA_CLAUSE: &str = "UU 13/2003 Pasal 79";

/// The result of a quota mutation, including the audit step.
///
/// Carries the new counter values for the caller to store; the ledger
/// itself holds no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaMutation {
    /// Annual quota after the mutation.
    pub annual_quota: u32,
    /// Used days after the mutation.
    pub used_quota: u32,
    /// Remaining balance derived from the new counters. May be negative.
    pub remaining: i64,
    /// Warning raised when the remaining balance is negative.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this mutation.
    pub audit_step: AuditStep,
}

/// Debits approved leave days from an employee's quota counters.
///
/// Increases the used counter by `days` and re-derives the remaining
/// balance. A negative balance is allowed and surfaces as a
/// `negative_remaining` warning, never as an error and never clamped.
///
/// # Arguments
///
/// * `annual_quota` - The employee's current annual quota
/// * `used_quota` - The employee's current used days
/// * `days` - Days to debit
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use hris_engine::leave::debit_quota;
///
/// let mutation = debit_quota(12, 3, 4, 1);
///
/// assert_eq!(mutation.used_quota, 7);
/// assert_eq!(mutation.remaining, 5);
/// assert!(mutation.warning.is_none());
/// ```
pub fn debit_quota(annual_quota: u32, used_quota: u32, days: u32, step_number: u32) -> QuotaMutation {
    let new_used = used_quota + days;
    let remaining = derive_remaining(annual_quota, new_used);
    let warning = negative_warning(remaining);

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_quota_debit".to_string(),
        rule_name: "Leave Quota Debit".to_string(),
        clause_ref: LEAVE_QUOTA_CLAUSE.to_string(),
        input: serde_json::json!({
            "annual_quota": annual_quota,
            "used_quota": used_quota,
            "days": days
        }),
        output: serde_json::json!({
            "used_quota": new_used,
            "remaining": remaining
        }),
        reasoning: format!(
            "Debited {} days; {} of {} now used, {} remaining",
            days, new_used, annual_quota, remaining
        ),
    };

    QuotaMutation {
        annual_quota,
        used_quota: new_used,
        remaining,
        warning,
        audit_step,
    }
}

/// Replaces an employee's annual quota, keeping the used counter.
///
/// Setting the quota below the days already used drives the remaining
/// balance negative; that is allowed and surfaces as a warning.
///
/// # Arguments
///
/// * `new_annual_quota` - The quota to store
/// * `used_quota` - The employee's current used days
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use hris_engine::leave::set_annual_quota;
///
/// let mutation = set_annual_quota(5, 8, 1);
///
/// assert_eq!(mutation.remaining, -3);
/// assert!(mutation.warning.is_some());
/// ```
pub fn set_annual_quota(new_annual_quota: u32, used_quota: u32, step_number: u32) -> QuotaMutation {
    let remaining = derive_remaining(new_annual_quota, used_quota);
    let warning = negative_warning(remaining);

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_quota_set".to_string(),
        rule_name: "Leave Quota Set".to_string(),
        clause_ref: LEAVE_QUOTA_CLAUSE.to_string(),
        input: serde_json::json!({
            "new_annual_quota": new_annual_quota,
            "used_quota": used_quota
        }),
        output: serde_json::json!({
            "annual_quota": new_annual_quota,
            "remaining": remaining
        }),
        reasoning: format!(
            "Annual quota set to {} with {} days already used, {} remaining",
            new_annual_quota, used_quota, remaining
        ),
    };

    QuotaMutation {
        annual_quota: new_annual_quota,
        used_quota,
        remaining,
        warning,
        audit_step,
    }
}

fn negative_warning(remaining: i64) -> Option<AuditWarning> {
    if remaining < 0 {
        Some(AuditWarning {
            code: "negative_remaining".to_string(),
            message: format!("Remaining leave balance is negative: {}", remaining),
            severity: "medium".to_string(),
        })
    } else {
        None
    }
}
