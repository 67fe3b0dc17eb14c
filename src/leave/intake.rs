//! Leave request intake functionality.
//!
//! This module validates a submission and opens the request with both
//! approval stages pending. The quota is only checked here, never
//! debited; the debit happens on final approval.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalSlot, ApprovalStatus, AuditStep, Employee, LeaveRequest, LeaveType};

/// Statutory reference for annual leave entitlement.
const LEAVE_INTAKE_CLAUSE: &str = "UU 13/2003 Pasal 79";

/// The result of opening a leave request, including the audit step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOpening {
    /// The newly opened request, both stages pending.
    pub request: LeaveRequest,
    /// The employee's remaining balance at submission time.
    pub remaining_before: i64,
    /// The audit step recording the intake.
    pub audit_step: AuditStep,
}

/// Counts the days in a leave span, both endpoints included.
///
/// # Errors
///
/// Returns a `Validation` error when `end_date` is before `start_date`.
///
/// # Examples
///
/// ```
/// use hris_engine::leave::inclusive_day_count;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
///
/// assert_eq!(inclusive_day_count(start, end).unwrap(), 3);
/// assert_eq!(inclusive_day_count(start, start).unwrap(), 1);
/// ```
pub fn inclusive_day_count(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<u32> {
    if end_date < start_date {
        return Err(EngineError::Validation {
            field: "end_date".to_string(),
            message: "must not be before start_date".to_string(),
        });
    }
    Ok((end_date - start_date).num_days() as u32 + 1)
}

/// Validates a submission and opens the request.
///
/// Checks the employee is active, the date span is valid, the reason is
/// present, and, for annual leave only, that the remaining balance
/// covers the span. Nothing is debited here.
///
/// # Arguments
///
/// * `employee` - The employee the leave is for
/// * `leave_type` - The category of leave
/// * `start_date` - First day of leave (inclusive)
/// * `end_date` - Last day of leave (inclusive)
/// * `reason` - Free-text justification
/// * `approver_titles` - Stage one and stage two approver titles
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a [`RequestOpening`] on success, or a `Validation` error if:
/// - the employee is not active
/// - `end_date` is before `start_date`
/// - `reason` is empty
/// - annual leave would exceed the remaining balance
pub fn open_request(
    employee: &Employee,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
    approver_titles: (&str, &str),
    step_number: u32,
) -> EngineResult<RequestOpening> {
    if !employee.is_active() {
        return Err(EngineError::Validation {
            field: "employee_id".to_string(),
            message: format!("employee '{}' is not active", employee.id),
        });
    }
    if reason.trim().is_empty() {
        return Err(EngineError::Validation {
            field: "reason".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let total_days = inclusive_day_count(start_date, end_date)?;
    let remaining_before = employee.remaining_leave_quota();

    // Only annual leave draws on the quota, so only annual leave is
    // blocked by an insufficient balance.
    if leave_type.debits_quota() && i64::from(total_days) > remaining_before {
        return Err(EngineError::Validation {
            field: "total_days".to_string(),
            message: format!(
                "{} days requested but only {} remaining in annual quota",
                total_days, remaining_before
            ),
        });
    }

    let (stage_one_title, stage_two_title) = approver_titles;
    let request = LeaveRequest {
        id: Uuid::new_v4().to_string(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        leave_type,
        start_date,
        end_date,
        total_days,
        reason: reason.to_string(),
        status: ApprovalStatus::Pending,
        stage_one: ApprovalSlot::pending(stage_one_title),
        stage_two: ApprovalSlot::pending(stage_two_title),
        created_at: Utc::now(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_request_intake".to_string(),
        rule_name: "Leave Request Intake".to_string(),
        clause_ref: LEAVE_INTAKE_CLAUSE.to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "leave_type": leave_type,
            "start_date": start_date.to_string(),
            "end_date": end_date.to_string(),
            "remaining_before": remaining_before
        }),
        output: serde_json::json!({
            "request_id": request.id,
            "total_days": total_days,
            "status": request.status
        }),
        reasoning: format!(
            "{} day span opened pending {} then {}",
            total_days, request.stage_one.approver_title, request.stage_two.approver_title
        ),
    };

    Ok(RequestOpening {
        request,
        remaining_before,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allowances, EmployeeStatus};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Budi Santoso".to_string(),
            basic_salary: Decimal::from_str("5000000").unwrap(),
            allowances: Allowances::default(),
            annual_leave_quota: 12,
            used_leave_quota: 3,
            status: EmployeeStatus::Active,
            latest_payroll_id: None,
        }
    }

    const TITLES: (&str, &str) = ("Manager", "HR Director");

    // ==========================================================================
    // LRI-001: inclusive day count
    // ==========================================================================
    #[test]
    fn test_lri_001_inclusive_day_count() {
        assert_eq!(
            inclusive_day_count(make_date("2026-09-07"), make_date("2026-09-09")).unwrap(),
            3
        );
        assert_eq!(
            inclusive_day_count(make_date("2026-09-07"), make_date("2026-09-07")).unwrap(),
            1
        );
    }

    // ==========================================================================
    // LRI-002: end before start rejected
    // ==========================================================================
    #[test]
    fn test_lri_002_end_before_start_rejected() {
        let result = inclusive_day_count(make_date("2026-09-09"), make_date("2026-09-07"));

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "end_date"),
            _ => panic!("Expected Validation error"),
        }
    }

    // ==========================================================================
    // LRI-003: valid annual submission opens pending at both stages
    // ==========================================================================
    #[test]
    fn test_lri_003_valid_annual_submission() {
        let employee = create_test_employee();
        let opening = open_request(
            &employee,
            LeaveType::Annual,
            make_date("2026-09-07"),
            make_date("2026-09-09"),
            "Family event",
            TITLES,
            1,
        )
        .unwrap();

        let request = &opening.request;
        assert_eq!(request.total_days, 3);
        assert_eq!(request.status, ApprovalStatus::Pending);
        assert_eq!(request.stage_one.status, ApprovalStatus::Pending);
        assert_eq!(request.stage_two.status, ApprovalStatus::Pending);
        assert_eq!(request.stage_one.approver_title, "Manager");
        assert_eq!(request.stage_two.approver_title, "HR Director");
        assert_eq!(opening.remaining_before, 9);
    }

    // ==========================================================================
    // LRI-004: annual submission over the remaining balance rejected
    // ==========================================================================
    #[test]
    fn test_lri_004_annual_over_balance_rejected() {
        let employee = create_test_employee();
        // 9 days remain; a 10 day span must be rejected
        let result = open_request(
            &employee,
            LeaveType::Annual,
            make_date("2026-09-01"),
            make_date("2026-09-10"),
            "Long holiday",
            TITLES,
            1,
        );

        match result {
            Err(EngineError::Validation { field, message }) => {
                assert_eq!(field, "total_days");
                assert!(message.contains("10 days requested"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    // ==========================================================================
    // LRI-005: sick leave skips the quota check
    // ==========================================================================
    #[test]
    fn test_lri_005_sick_leave_skips_quota_check() {
        let employee = create_test_employee();
        // Far beyond the 9 remaining annual days, but sick leave does not draw on them
        let opening = open_request(
            &employee,
            LeaveType::Sick,
            make_date("2026-09-01"),
            make_date("2026-09-30"),
            "Surgery recovery",
            TITLES,
            1,
        )
        .unwrap();

        assert_eq!(opening.request.total_days, 30);
    }

    // ==========================================================================
    // LRI-006: inactive employee rejected
    // ==========================================================================
    #[test]
    fn test_lri_006_inactive_employee_rejected() {
        let mut employee = create_test_employee();
        employee.status = EmployeeStatus::Inactive;

        let result = open_request(
            &employee,
            LeaveType::Annual,
            make_date("2026-09-07"),
            make_date("2026-09-09"),
            "Family event",
            TITLES,
            1,
        );

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "employee_id"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_empty_reason_rejected() {
        let employee = create_test_employee();
        let result = open_request(
            &employee,
            LeaveType::Annual,
            make_date("2026-09-07"),
            make_date("2026-09-09"),
            "   ",
            TITLES,
            1,
        );

        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "reason"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_exact_balance_accepted() {
        let employee = create_test_employee();
        // Exactly the 9 remaining days
        let opening = open_request(
            &employee,
            LeaveType::Annual,
            make_date("2026-09-01"),
            make_date("2026-09-09"),
            "Extended trip",
            TITLES,
            1,
        )
        .unwrap();

        assert_eq!(opening.request.total_days, 9);
    }

    #[test]
    fn test_requests_get_distinct_ids() {
        let employee = create_test_employee();
        let first = open_request(
            &employee,
            LeaveType::Personal,
            make_date("2026-09-07"),
            make_date("2026-09-07"),
            "Errand",
            TITLES,
            1,
        )
        .unwrap();
        let second = open_request(
            &employee,
            LeaveType::Personal,
            make_date("2026-09-08"),
            make_date("2026-09-08"),
            "Errand",
            TITLES,
            1,
        )
        .unwrap();

        assert_ne!(first.request.id, second.request.id);
    }
}
