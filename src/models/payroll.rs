//! Payroll record model and its input/output halves.
//!
//! A [`PayrollRecord`] stores both the inputs a calculation ran with and
//! every derived output, so edits can recompute the outputs from scratch
//! and historical records stay self-describing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// Monthly allowance components paid on top of basic salary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Allowances {
    /// Transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Meal allowance.
    #[serde(default)]
    pub meal: Decimal,
    /// Any other recurring allowances, pre-summed.
    #[serde(default)]
    pub other: Decimal,
}

impl Allowances {
    /// Sums the three components.
    pub fn total(&self) -> Decimal {
        self.transport + self.meal + self.other
    }
}

/// The inputs a payroll calculation runs from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollInputs {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Allowance components.
    #[serde(default)]
    pub allowances: Allowances,
    /// Overtime hours accumulated over the period.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Ad-hoc deductions beyond statutory contributions and tax.
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// Every figure derived from [`PayrollInputs`] by the payroll engine.
///
/// All amounts carry full decimal precision; nothing is rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// Sum of the allowance components.
    pub total_allowances: Decimal,
    /// Hourly overtime rate (basic / divisor × multiplier).
    pub overtime_rate: Decimal,
    /// Overtime pay for the period.
    pub overtime_pay: Decimal,
    /// Basic + allowances + overtime pay.
    pub gross_salary: Decimal,
    /// Health insurance contribution, a percentage of basic salary.
    pub bpjs_kesehatan: Decimal,
    /// Employment insurance contribution, a percentage of basic salary.
    pub bpjs_ketenagakerjaan: Decimal,
    /// Monthly income tax from the annualised gross.
    pub tax: Decimal,
    /// Contributions + tax + other deductions.
    pub total_deductions: Decimal,
    /// Gross minus total deductions.
    pub net_salary: Decimal,
}

/// A stored payroll result for one employee and one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The employee's name at calculation time.
    pub employee_name: String,
    /// The pay period the record covers.
    pub period: PayPeriod,
    /// The inputs the calculation ran with.
    pub inputs: PayrollInputs,
    /// The derived outputs.
    pub computation: PayrollComputation,
    /// When the record was produced.
    pub created_at: DateTime<Utc>,
}
