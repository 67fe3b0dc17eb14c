//! Overtime pay calculation functionality.
//!
//! This module converts a monthly basic salary into an hourly rate using
//! the statutory monthly divisor, applies the overtime multiplier, and
//! prices a number of overtime hours.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Statutory reference for overtime pay computation.
const OVERTIME_PAY_CLAUSE: &str = "Kepmenakertrans 102/MEN/VI/2004 Pasal 8, 11";

/// Default divisor converting monthly basic salary to an hourly rate.
pub const DEFAULT_MONTHLY_DIVISOR_HOURS: Decimal = Decimal::from_parts(173, 0, 0, false, 0);

/// Default multiplier applied to the hourly rate for overtime hours.
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// The result of pricing overtime hours, including the audit step.
///
/// All amounts carry full decimal precision; nothing is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePayCalculation {
    /// Basic salary divided by the monthly divisor.
    pub hourly_rate: Decimal,
    /// Hourly rate multiplied by the overtime multiplier.
    pub overtime_rate: Decimal,
    /// Overtime rate multiplied by the overtime hours.
    pub overtime_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices overtime hours from a monthly basic salary.
///
/// The hourly rate is `basic_salary / divisor`, the overtime rate is
/// `hourly_rate * multiplier`, and the pay is `overtime_rate * hours`.
/// No intermediate value is rounded.
///
/// # Arguments
///
/// * `basic_salary` - Monthly basic salary
/// * `overtime_hours` - Overtime hours to price
/// * `divisor` - Hours divisor for the month (typically 173)
/// * `multiplier` - Overtime premium multiplier (typically 1.5)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns an [`OvertimePayCalculation`] on success, or an error if:
/// - `basic_salary` or `overtime_hours` is negative (`Validation`)
/// - `divisor` is not positive (`CalculationError`)
///
/// # Examples
///
/// ```
/// use hris_engine::calculation::{
///     calculate_overtime_pay, DEFAULT_MONTHLY_DIVISOR_HOURS, DEFAULT_OVERTIME_MULTIPLIER,
/// };
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let basic = Decimal::from_str("3460000").unwrap();
/// let hours = Decimal::from_str("10").unwrap();
///
/// let result = calculate_overtime_pay(
///     basic,
///     hours,
///     DEFAULT_MONTHLY_DIVISOR_HOURS,
///     DEFAULT_OVERTIME_MULTIPLIER,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(result.hourly_rate, Decimal::from_str("20000").unwrap());
/// assert_eq!(result.overtime_rate, Decimal::from_str("30000").unwrap());
/// assert_eq!(result.overtime_pay, Decimal::from_str("300000").unwrap());
/// ```
pub fn calculate_overtime_pay(
    basic_salary: Decimal,
    overtime_hours: Decimal,
    divisor: Decimal,
    multiplier: Decimal,
    step_number: u32,
) -> EngineResult<OvertimePayCalculation> {
    if basic_salary < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "basic_salary".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if overtime_hours < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "overtime_hours".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if divisor <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("monthly divisor must be positive, got {}", divisor),
        });
    }

    let hourly_rate = basic_salary / divisor;
    let overtime_rate = hourly_rate * multiplier;
    let overtime_pay = overtime_rate * overtime_hours;

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        clause_ref: OVERTIME_PAY_CLAUSE.to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "monthly_divisor_hours": divisor.normalize().to_string(),
            "overtime_multiplier": multiplier.normalize().to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.normalize().to_string(),
            "overtime_rate": overtime_rate.normalize().to_string(),
            "overtime_pay": overtime_pay.normalize().to_string()
        }),
        reasoning: format!(
            "Hourly rate {} from basic salary {} over {} hours; {} overtime hours at {}x premium",
            hourly_rate.normalize(),
            basic_salary.normalize(),
            divisor.normalize(),
            overtime_hours.normalize(),
            multiplier.normalize()
        ),
    };

    Ok(OvertimePayCalculation {
        hourly_rate,
        overtime_rate,
        overtime_pay,
        audit_step,
    })
}
