//! Employee model and related types.
//!
//! This module defines the Employee struct and EmployeeStatus enum
//! for representing workers in the HR administration system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Allowances;

/// Represents whether an employee is currently employed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed; included in payroll runs.
    Active,
    /// No longer employed; skipped by payroll runs.
    Inactive,
}

/// Derives the remaining leave quota from the annual quota and used days.
///
/// This is the only place the remaining balance is computed; it is never
/// stored. The result is signed because an administrator may shrink the
/// annual quota below what has already been used.
///
/// # Examples
///
/// ```
/// use hris_engine::models::derive_remaining;
///
/// assert_eq!(derive_remaining(12, 3), 9);
/// assert_eq!(derive_remaining(5, 8), -3);
/// ```
pub fn derive_remaining(annual: u32, used: u32) -> i64 {
    i64::from(annual) - i64::from(used)
}

/// Represents an employee subject to payroll and leave administration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's full name.
    pub name: String,
    /// Monthly basic salary in rupiah.
    pub basic_salary: Decimal,
    /// Fixed monthly allowances.
    pub allowances: Allowances,
    /// Annual leave quota in days.
    pub annual_leave_quota: u32,
    /// Annual leave days already used this year.
    pub used_leave_quota: u32,
    /// Whether the employee is active or has left.
    pub status: EmployeeStatus,
    /// The most recent payroll record generated for this employee.
    #[serde(default)]
    pub latest_payroll_id: Option<String>,
}

impl Employee {
    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Returns the remaining leave quota, derived from the stored counters.
    ///
    /// # Examples
    ///
    /// ```
    /// use hris_engine::models::{Allowances, Employee, EmployeeStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Budi Santoso".to_string(),
    ///     basic_salary: Decimal::new(15_000_000, 0),
    ///     allowances: Allowances::default(),
    ///     annual_leave_quota: 12,
    ///     used_leave_quota: 3,
    ///     status: EmployeeStatus::Active,
    ///     latest_payroll_id: None,
    /// };
    /// assert_eq!(employee.remaining_leave_quota(), 9);
    /// ```
    pub fn remaining_leave_quota(&self) -> i64 {
        derive_remaining(self.annual_leave_quota, self.used_leave_quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(annual: u32, used: u32) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Budi Santoso".to_string(),
            basic_salary: Decimal::new(15_000_000, 0),
            allowances: Allowances {
                transport: Decimal::new(1_000_000, 0),
                meal: Decimal::new(500_000, 0),
                other: Decimal::new(500_000, 0),
            },
            annual_leave_quota: annual,
            used_leave_quota: used,
            status: EmployeeStatus::Active,
            latest_payroll_id: None,
        }
    }

    #[test]
    fn test_derive_remaining_basic() {
        assert_eq!(derive_remaining(12, 0), 12);
        assert_eq!(derive_remaining(12, 3), 9);
        assert_eq!(derive_remaining(12, 12), 0);
    }

    #[test]
    fn test_derive_remaining_goes_negative() {
        // Quota shrunk below usage is a warning condition, not an error
        assert_eq!(derive_remaining(5, 8), -3);
        assert_eq!(derive_remaining(0, 1), -1);
    }

    #[test]
    fn test_remaining_leave_quota_uses_derivation() {
        let employee = create_test_employee(12, 3);
        assert_eq!(employee.remaining_leave_quota(), 9);

        let overdrawn = create_test_employee(2, 7);
        assert_eq!(overdrawn.remaining_leave_quota(), -5);
    }

    #[test]
    fn test_is_active() {
        let mut employee = create_test_employee(12, 0);
        assert!(employee.is_active());

        employee.status = EmployeeStatus::Inactive;
        assert!(!employee.is_active());
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "emp_001",
            "name": "Budi Santoso",
            "basic_salary": "15000000",
            "allowances": {
                "transport": "1000000",
                "meal": "500000",
                "other": "500000"
            },
            "annual_leave_quota": 12,
            "used_leave_quota": 3,
            "status": "active"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.basic_salary, Decimal::new(15_000_000, 0));
        assert_eq!(employee.allowances.transport, Decimal::new(1_000_000, 0));
        assert_eq!(employee.annual_leave_quota, 12);
        assert_eq!(employee.status, EmployeeStatus::Active);
        assert_eq!(employee.latest_payroll_id, None);
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = create_test_employee(12, 3);
        let json = serde_json::to_string(&employee).unwrap();

        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }

    #[test]
    fn test_serialized_employee_has_no_remaining_field() {
        // The remaining balance is always derived, never persisted
        let employee = create_test_employee(12, 3);
        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("remaining"));
    }

    #[test]
    fn test_employee_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }
}
