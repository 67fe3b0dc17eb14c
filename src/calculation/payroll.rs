//! Payroll calculation engine.
//!
//! This module runs the full monthly payroll pipeline for one employee:
//! allowance total, overtime pay, gross salary, statutory contributions,
//! monthly income tax, and net salary. Every step lands in the audit
//! trace in execution order, and no amount is rounded anywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, AuditWarning, PayrollComputation, PayrollInputs};

use super::income_tax::calculate_monthly_tax;
use super::overtime_pay::calculate_overtime_pay;

/// Statutory reference for contribution withholding.
const CONTRIBUTIONS_CLAUSE: &str = "Perpres 82/2018 Pasal 30; PP 46/2015 Pasal 16";

/// Statutory reference for wage composition.
const WAGE_COMPOSITION_CLAUSE: &str = "UU 13/2003 Pasal 94";

/// The result of a full payroll run for one employee and one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// Every derived figure of the run.
    pub computation: PayrollComputation,
    /// Ordered audit steps, warnings, and timing for the run.
    pub audit: AuditTrace,
}

/// Runs the payroll pipeline over one employee's monthly inputs.
///
/// Steps execute in a fixed order: allowance total, overtime pay, gross
/// salary, statutory contributions, monthly income tax, net salary.
/// Contributions are assessed on basic salary only. The identities
/// `gross == basic + allowances + overtime_pay` and
/// `net == gross - total_deductions` hold exactly because nothing is
/// rounded.
///
/// # Arguments
///
/// * `inputs` - Basic salary, allowances, overtime hours, and deductions
/// * `config` - Loaded policy configuration
///
/// # Returns
///
/// Returns a [`PayrollCalculation`] on success, or an error if:
/// - any monetary input or the overtime hours are negative (`Validation`)
/// - the tax schedule is unusable (`CalculationError`)
///
/// A negative net salary is not an error; it produces a
/// `negative_net_salary` warning on the audit trace instead.
///
/// # Examples
///
/// ```no_run
/// use hris_engine::calculation::calculate_payroll;
/// use hris_engine::config::ConfigLoader;
/// use hris_engine::models::{Allowances, PayrollInputs};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = ConfigLoader::load("./config/hris").unwrap();
/// let inputs = PayrollInputs {
///     basic_salary: Decimal::from_str("15000000").unwrap(),
///     allowances: Allowances {
///         transport: Decimal::from_str("1000000").unwrap(),
///         meal: Decimal::from_str("500000").unwrap(),
///         other: Decimal::from_str("500000").unwrap(),
///     },
///     overtime_hours: Decimal::ZERO,
///     other_deductions: Decimal::ZERO,
/// };
///
/// let result = calculate_payroll(&inputs, &config).unwrap();
/// assert_eq!(
///     result.computation.net_salary,
///     Decimal::from_str("14500000").unwrap()
/// );
/// ```
pub fn calculate_payroll(
    inputs: &PayrollInputs,
    config: &ConfigLoader,
) -> EngineResult<PayrollCalculation> {
    let start_time = Instant::now();

    validate_inputs(inputs)?;

    let mut all_audit_steps = Vec::new();
    let mut all_warnings = Vec::new();
    let mut step_number = 1u32;

    // Step: allowance total
    let total_allowances = inputs.allowances.total();
    all_audit_steps.push(AuditStep {
        step_number,
        rule_id: "allowance_total".to_string(),
        rule_name: "Allowance Total".to_string(),
        clause_ref: WAGE_COMPOSITION_CLAUSE.to_string(),
        input: serde_json::json!({
            "transport": inputs.allowances.transport.normalize().to_string(),
            "meal": inputs.allowances.meal.normalize().to_string(),
            "other": inputs.allowances.other.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_allowances": total_allowances.normalize().to_string()
        }),
        reasoning: format!(
            "Transport, meal and other allowances sum to {}",
            total_allowances.normalize()
        ),
    });
    step_number += 1;

    // Step: overtime pay
    let overtime = calculate_overtime_pay(
        inputs.basic_salary,
        inputs.overtime_hours,
        config.monthly_divisor_hours(),
        config.overtime_multiplier(),
        step_number,
    )?;
    all_audit_steps.push(overtime.audit_step.clone());
    step_number += 1;

    // Step: gross salary
    let gross_salary = inputs.basic_salary + total_allowances + overtime.overtime_pay;
    all_audit_steps.push(AuditStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        clause_ref: WAGE_COMPOSITION_CLAUSE.to_string(),
        input: serde_json::json!({
            "basic_salary": inputs.basic_salary.normalize().to_string(),
            "total_allowances": total_allowances.normalize().to_string(),
            "overtime_pay": overtime.overtime_pay.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string()
        }),
        reasoning: format!(
            "Basic {} plus allowances {} plus overtime {} makes gross {}",
            inputs.basic_salary.normalize(),
            total_allowances.normalize(),
            overtime.overtime_pay.normalize(),
            gross_salary.normalize()
        ),
    });
    step_number += 1;

    // Step: statutory contributions, assessed on basic salary only
    let bpjs_kesehatan = inputs.basic_salary * config.kesehatan_rate();
    let bpjs_ketenagakerjaan = inputs.basic_salary * config.ketenagakerjaan_rate();
    all_audit_steps.push(AuditStep {
        step_number,
        rule_id: "statutory_contributions".to_string(),
        rule_name: "Statutory Contributions".to_string(),
        clause_ref: CONTRIBUTIONS_CLAUSE.to_string(),
        input: serde_json::json!({
            "basic_salary": inputs.basic_salary.normalize().to_string(),
            "kesehatan_rate": config.kesehatan_rate().normalize().to_string(),
            "ketenagakerjaan_rate": config.ketenagakerjaan_rate().normalize().to_string()
        }),
        output: serde_json::json!({
            "bpjs_kesehatan": bpjs_kesehatan.normalize().to_string(),
            "bpjs_ketenagakerjaan": bpjs_ketenagakerjaan.normalize().to_string()
        }),
        reasoning: format!(
            "Contributions assessed on basic salary {} only, not gross",
            inputs.basic_salary.normalize()
        ),
    });
    step_number += 1;

    // Step: monthly income tax over the annualised gross
    let tax = calculate_monthly_tax(gross_salary, config.tax_brackets(), step_number)?;
    all_audit_steps.push(tax.audit_step.clone());
    step_number += 1;

    // Step: net salary
    let total_deductions =
        bpjs_kesehatan + bpjs_ketenagakerjaan + tax.monthly_tax + inputs.other_deductions;
    let net_salary = gross_salary - total_deductions;
    all_audit_steps.push(AuditStep {
        step_number,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        clause_ref: WAGE_COMPOSITION_CLAUSE.to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "bpjs_kesehatan": bpjs_kesehatan.normalize().to_string(),
            "bpjs_ketenagakerjaan": bpjs_ketenagakerjaan.normalize().to_string(),
            "tax": tax.monthly_tax.normalize().to_string(),
            "other_deductions": inputs.other_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.normalize().to_string(),
            "net_salary": net_salary.normalize().to_string()
        }),
        reasoning: format!(
            "Gross {} minus deductions {} leaves net {}",
            gross_salary.normalize(),
            total_deductions.normalize(),
            net_salary.normalize()
        ),
    });

    if net_salary < Decimal::ZERO {
        all_warnings.push(AuditWarning {
            code: "negative_net_salary".to_string(),
            message: format!(
                "Net salary {} is negative; deductions exceed gross pay",
                net_salary.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(PayrollCalculation {
        computation: PayrollComputation {
            total_allowances,
            overtime_rate: overtime.overtime_rate,
            overtime_pay: overtime.overtime_pay,
            gross_salary,
            bpjs_kesehatan,
            bpjs_ketenagakerjaan,
            tax: tax.monthly_tax,
            total_deductions,
            net_salary,
        },
        audit: AuditTrace {
            steps: all_audit_steps,
            warnings: all_warnings,
            duration_us,
        },
    })
}

fn validate_inputs(inputs: &PayrollInputs) -> EngineResult<()> {
    let non_negative = [
        ("basic_salary", inputs.basic_salary),
        ("allowances.transport", inputs.allowances.transport),
        ("allowances.meal", inputs.allowances.meal),
        ("allowances.other", inputs.allowances.other),
        ("overtime_hours", inputs.overtime_hours),
        ("other_deductions", inputs.other_deductions),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: field.to_string(),
                message: "must not be negative".to_string(),
            });
        }
    }
    Ok(())
}
