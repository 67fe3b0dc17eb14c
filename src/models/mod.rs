//! Core data models for the payroll and leave engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod employee;
mod leave_request;
mod pay_period;
mod payroll;

pub use attendance::{AttendanceStatus, DailyAttendance};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{Employee, EmployeeStatus, derive_remaining};
pub use leave_request::{ApprovalSlot, ApprovalStatus, LeaveRequest, LeaveType};
pub use pay_period::PayPeriod;
pub use payroll::{Allowances, PayrollComputation, PayrollInputs, PayrollRecord};
