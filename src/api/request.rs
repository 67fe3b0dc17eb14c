//! Request types for the HRIS engine API.
//!
//! This module defines the JSON request structures for all endpoints,
//! with conversions into the domain types they carry.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::leave::Decision;
use crate::models::{Allowances, LeaveType, PayPeriod, PayrollInputs};
use crate::store::NewEmployee;

/// Allowance components in a request. Every component defaults to zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AllowancesRequest {
    /// Monthly transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Monthly meal allowance.
    #[serde(default)]
    pub meal: Decimal,
    /// Other fixed monthly allowances.
    #[serde(default)]
    pub other: Decimal,
}

/// Request body for `POST /payroll/calculate` and
/// `PUT /payroll/records/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollInputsRequest {
    /// Monthly basic salary in rupiah.
    pub basic_salary: Decimal,
    /// Fixed monthly allowances.
    #[serde(default)]
    pub allowances: AllowancesRequest,
    /// Overtime hours worked in the period.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Additional deductions beyond the statutory ones.
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// Request body for `POST /attendance/resolve`.
///
/// Times are clock times in `HH:MM:SS` form; a check-out earlier than
/// the check-in is read as a shift ending on the following day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveIntervalRequest {
    /// Clock-in time of day.
    pub check_in: NaiveTime,
    /// Clock-out time of day.
    pub check_out: NaiveTime,
}

/// Request body for `POST /attendance/check-in` and
/// `POST /attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendancePunchRequest {
    /// The employee punching.
    pub employee_id: String,
    /// The day the punch belongs to. An overnight check-out is sent
    /// against its check-in day.
    pub date: NaiveDate,
    /// The punch time of day.
    pub time: NaiveTime,
}

/// Request body for `POST /leave/requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSubmissionRequest {
    /// The requesting employee.
    pub employee_id: String,
    /// The type of leave requested.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// The stated reason for the request.
    pub reason: String,
}

/// Request body for the stage decision endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDecisionRequest {
    /// The decision to record.
    pub decision: Decision,
}

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployeeRequest {
    /// The employee's full name.
    pub name: String,
    /// Monthly basic salary in rupiah.
    pub basic_salary: Decimal,
    /// Fixed monthly allowances.
    #[serde(default)]
    pub allowances: AllowancesRequest,
    /// Annual leave quota in days; the configured default applies when
    /// omitted.
    #[serde(default)]
    pub annual_leave_quota: Option<u32>,
}

/// Request body for `PUT /employees/{id}/quota`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaUpdateRequest {
    /// The new annual leave quota in days.
    pub annual_leave_quota: u32,
}

/// Request body for `POST /payroll/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// The period to run, as `YYYY-MM`.
    pub period: PayPeriod,
}

/// Request body for `POST /kpi/achievement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiRequest {
    /// The achieved value.
    pub actual: Decimal,
    /// The target value.
    pub target: Decimal,
}

impl From<AllowancesRequest> for Allowances {
    fn from(req: AllowancesRequest) -> Self {
        Allowances {
            transport: req.transport,
            meal: req.meal,
            other: req.other,
        }
    }
}

impl From<PayrollInputsRequest> for PayrollInputs {
    fn from(req: PayrollInputsRequest) -> Self {
        PayrollInputs {
            basic_salary: req.basic_salary,
            allowances: req.allowances.into(),
            overtime_hours: req.overtime_hours,
            other_deductions: req.other_deductions,
        }
    }
}

impl From<NewEmployeeRequest> for NewEmployee {
    fn from(req: NewEmployeeRequest) -> Self {
        NewEmployee {
            name: req.name,
            basic_salary: req.basic_salary,
            allowances: req.allowances.into(),
            annual_leave_quota: req.annual_leave_quota,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_payroll_inputs_request() {
        let json = r#"{
            "basic_salary": "15000000",
            "allowances": {
                "transport": "1000000",
                "meal": "500000",
                "other": "500000"
            },
            "overtime_hours": "10",
            "other_deductions": "0"
        }"#;

        let request: PayrollInputsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.basic_salary, Decimal::from_str("15000000").unwrap());
        assert_eq!(
            request.allowances.transport,
            Decimal::from_str("1000000").unwrap()
        );
        assert_eq!(request.overtime_hours, Decimal::from_str("10").unwrap());
    }

    #[test]
    fn test_payroll_inputs_request_defaults() {
        let json = r#"{"basic_salary": "3460000"}"#;

        let request: PayrollInputsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.allowances.transport, Decimal::ZERO);
        assert_eq!(request.overtime_hours, Decimal::ZERO);
        assert_eq!(request.other_deductions, Decimal::ZERO);

        let inputs: PayrollInputs = request.into();
        assert_eq!(inputs.allowances.total(), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_leave_submission() {
        let json = r#"{
            "employee_id": "emp_001",
            "leave_type": "annual",
            "start_date": "2026-09-07",
            "end_date": "2026-09-09",
            "reason": "Family event"
        }"#;

        let request: LeaveSubmissionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "emp_001");
        assert_eq!(request.leave_type, LeaveType::Annual);
    }

    #[test]
    fn test_deserialize_stage_decision() {
        let request: StageDecisionRequest =
            serde_json::from_str(r#"{"decision": "approve"}"#).unwrap();
        assert_eq!(request.decision, Decision::Approve);

        let request: StageDecisionRequest =
            serde_json::from_str(r#"{"decision": "reject"}"#).unwrap();
        assert_eq!(request.decision, Decision::Reject);
    }

    #[test]
    fn test_deserialize_punch_request() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2026-08-25",
            "time": "08:00:00"
        }"#;

        let request: AttendancePunchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.date.to_string(), "2026-08-25");
        assert_eq!(request.time.to_string(), "08:00:00");
    }

    #[test]
    fn test_new_employee_request_conversion() {
        let json = r#"{
            "name": "Budi Santoso",
            "basic_salary": "15000000"
        }"#;

        let request: NewEmployeeRequest = serde_json::from_str(json).unwrap();
        let new: NewEmployee = request.into();
        assert_eq!(new.name, "Budi Santoso");
        assert_eq!(new.annual_leave_quota, None);
        assert_eq!(new.allowances.transport, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_run_request() {
        let request: PayrollRunRequest =
            serde_json::from_str(r#"{"period": "2026-08"}"#).unwrap();
        assert_eq!(request.period, PayPeriod::new(2026, 8).unwrap());
    }
}
