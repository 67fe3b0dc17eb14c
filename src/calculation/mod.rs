//! Calculation logic for the payroll and leave engine.
//!
//! This module contains all the calculation functions for determining pay,
//! including work interval resolution from clock punches, overtime pay
//! pricing from monthly basic salary, progressive income tax over annual
//! and annualised monthly income, KPI achievement banding, and the full
//! monthly payroll pipeline.

mod income_tax;
mod kpi;
mod overtime_pay;
mod payroll;
mod work_interval;

pub use income_tax::{
    AnnualTaxCalculation, MonthlyTaxCalculation, calculate_annual_tax, calculate_monthly_tax,
};
pub use kpi::{AchievementBand, KpiAssessment, assess_achievement};
pub use overtime_pay::{
    DEFAULT_MONTHLY_DIVISOR_HOURS, DEFAULT_OVERTIME_MULTIPLIER, OvertimePayCalculation,
    calculate_overtime_pay,
};
pub use payroll::{PayrollCalculation, calculate_payroll};
pub use work_interval::{
    DEFAULT_BREAK_DEDUCTION_HOURS, DEFAULT_BREAK_THRESHOLD_HOURS, DEFAULT_DAILY_REGULAR_HOURS,
    WorkIntervalResolution, resolve_work_interval,
};
