//! Progressive income tax calculation functionality.
//!
//! This module walks the bracketed tax schedule marginally: each bracket
//! taxes only the slice of income falling inside it. The monthly variant
//! annualises a monthly gross, taxes the annual figure, and divides the
//! result by twelve.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxBracket;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Statutory reference for the progressive tax schedule.
const TAX_SCHEDULE_CLAUSE: &str = "UU 7/2021 Pasal 17";

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// The result of taxing an annual income, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTaxCalculation {
    /// Total tax over the annual income.
    pub annual_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of taxing a monthly gross, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTaxCalculation {
    /// Monthly gross multiplied by twelve.
    pub annualised_income: Decimal,
    /// Total tax over the annualised income.
    pub annual_tax: Decimal,
    /// Annual tax divided by twelve; this is the payroll deduction.
    pub monthly_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Walks the schedule and taxes each bracket's slice of the income.
///
/// Returns the total tax and a per-bracket breakdown for the audit step.
/// Assumes the income is non-negative and the schedule is valid; callers
/// validate before invoking.
fn walk_brackets(
    annual_income: Decimal,
    brackets: &[TaxBracket],
) -> EngineResult<(Decimal, Vec<serde_json::Value>)> {
    if brackets.is_empty() {
        return Err(EngineError::CalculationError {
            message: "tax schedule has no brackets".to_string(),
        });
    }

    let mut total_tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for bracket in brackets {
        let slice_top = match bracket.upper_annual {
            Some(upper) if annual_income > upper => upper,
            _ => annual_income,
        };
        let taxable = if slice_top > lower {
            slice_top - lower
        } else {
            Decimal::ZERO
        };

        if taxable > Decimal::ZERO {
            let tax = taxable * bracket.rate;
            total_tax += tax;
            breakdown.push(serde_json::json!({
                "upper_annual": bracket
                    .upper_annual
                    .map(|u| u.normalize().to_string()),
                "rate": bracket.rate.normalize().to_string(),
                "taxable": taxable.normalize().to_string(),
                "tax": tax.normalize().to_string()
            }));
        }

        match bracket.upper_annual {
            Some(upper) if annual_income > upper => lower = upper,
            _ => break,
        }
    }

    Ok((total_tax, breakdown))
}

/// Taxes an annual income against the progressive schedule.
///
/// # Arguments
///
/// * `annual_income` - Annual taxable income
/// * `brackets` - The schedule, lowest threshold first, last unbounded
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns an [`AnnualTaxCalculation`] on success, or an error if:
/// - `annual_income` is negative (`Validation`)
/// - the schedule is empty (`CalculationError`)
///
/// # Examples
///
/// ```
/// use hris_engine::calculation::calculate_annual_tax;
/// use hris_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let brackets = vec![
///     TaxBracket {
///         upper_annual: Some(Decimal::from_str("60000000").unwrap()),
///         rate: Decimal::from_str("0.05").unwrap(),
///     },
///     TaxBracket {
///         upper_annual: None,
///         rate: Decimal::from_str("0.15").unwrap(),
///     },
/// ];
///
/// let income = Decimal::from_str("60000000").unwrap();
/// let result = calculate_annual_tax(income, &brackets, 1).unwrap();
///
/// assert_eq!(result.annual_tax, Decimal::from_str("3000000").unwrap());
/// ```
pub fn calculate_annual_tax(
    annual_income: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> EngineResult<AnnualTaxCalculation> {
    if annual_income < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "annual_income".to_string(),
            message: "must not be negative".to_string(),
        });
    }

    let (annual_tax, breakdown) = walk_brackets(annual_income, brackets)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "progressive_annual_tax".to_string(),
        rule_name: "Progressive Annual Tax".to_string(),
        clause_ref: TAX_SCHEDULE_CLAUSE.to_string(),
        input: serde_json::json!({
            "annual_income": annual_income.normalize().to_string(),
            "bracket_count": brackets.len()
        }),
        output: serde_json::json!({
            "annual_tax": annual_tax.normalize().to_string(),
            "brackets": breakdown
        }),
        reasoning: format!(
            "Marginal walk over {} brackets taxes {} at {}",
            brackets.len(),
            annual_income.normalize(),
            annual_tax.normalize()
        ),
    };

    Ok(AnnualTaxCalculation {
        annual_tax,
        audit_step,
    })
}

/// Taxes a monthly gross by annualising it first.
///
/// The monthly deduction is the tax on `monthly_gross * 12`, divided by
/// twelve. Mid-year salary changes are not re-projected.
///
/// # Arguments
///
/// * `monthly_gross` - Gross salary for the month
/// * `brackets` - The schedule, lowest threshold first, last unbounded
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a [`MonthlyTaxCalculation`] on success, or an error if:
/// - `monthly_gross` is negative (`Validation`)
/// - the schedule is empty (`CalculationError`)
///
/// # Examples
///
/// ```
/// use hris_engine::calculation::calculate_monthly_tax;
/// use hris_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let brackets = vec![
///     TaxBracket {
///         upper_annual: Some(Decimal::from_str("60000000").unwrap()),
///         rate: Decimal::from_str("0.05").unwrap(),
///     },
///     TaxBracket {
///         upper_annual: None,
///         rate: Decimal::from_str("0.15").unwrap(),
///     },
/// ];
///
/// let gross = Decimal::from_str("5000000").unwrap();
/// let result = calculate_monthly_tax(gross, &brackets, 1).unwrap();
///
/// assert_eq!(result.monthly_tax, Decimal::from_str("250000").unwrap());
/// ```
pub fn calculate_monthly_tax(
    monthly_gross: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> EngineResult<MonthlyTaxCalculation> {
    if monthly_gross < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "monthly_gross".to_string(),
            message: "must not be negative".to_string(),
        });
    }

    let annualised_income = monthly_gross * MONTHS_PER_YEAR;
    let (annual_tax, breakdown) = walk_brackets(annualised_income, brackets)?;
    let monthly_tax = annual_tax / MONTHS_PER_YEAR;

    let audit_step = AuditStep {
        step_number,
        rule_id: "monthly_income_tax".to_string(),
        rule_name: "Monthly Income Tax".to_string(),
        clause_ref: TAX_SCHEDULE_CLAUSE.to_string(),
        input: serde_json::json!({
            "monthly_gross": monthly_gross.normalize().to_string(),
            "bracket_count": brackets.len()
        }),
        output: serde_json::json!({
            "annualised_income": annualised_income.normalize().to_string(),
            "annual_tax": annual_tax.normalize().to_string(),
            "monthly_tax": monthly_tax.normalize().to_string(),
            "brackets": breakdown
        }),
        reasoning: format!(
            "Annualised {} to {}, taxed at {}, divided back to {} per month",
            monthly_gross.normalize(),
            annualised_income.normalize(),
            annual_tax.normalize(),
            monthly_tax.normalize()
        ),
    };

    Ok(MonthlyTaxCalculation {
        annualised_income,
        annual_tax,
        monthly_tax,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn standard_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                upper_annual: Some(dec("60000000")),
                rate: dec("0.05"),
            },
            TaxBracket {
                upper_annual: Some(dec("250000000")),
                rate: dec("0.15"),
            },
            TaxBracket {
                upper_annual: Some(dec("500000000")),
                rate: dec("0.25"),
            },
            TaxBracket {
                upper_annual: None,
                rate: dec("0.30"),
            },
        ]
    }

    // ==========================================================================
    // TAX-001: income inside the first bracket
    // ==========================================================================
    #[test]
    fn test_tax_001_first_bracket() {
        let result = calculate_annual_tax(dec("50000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("2500000"));
    }

    // ==========================================================================
    // TAX-002: income exactly at the first threshold
    // ==========================================================================
    #[test]
    fn test_tax_002_exactly_at_first_threshold() {
        let result = calculate_annual_tax(dec("60000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("3000000"));
    }

    // ==========================================================================
    // TAX-003: income spanning two brackets
    // ==========================================================================
    #[test]
    fn test_tax_003_second_bracket() {
        // 3,000,000 over the first 60M plus 15% of the next 60M
        let result = calculate_annual_tax(dec("120000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("12000000"));
    }

    // ==========================================================================
    // TAX-004: income at the second threshold
    // ==========================================================================
    #[test]
    fn test_tax_004_exactly_at_second_threshold() {
        let result = calculate_annual_tax(dec("250000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("31500000"));
    }

    // ==========================================================================
    // TAX-005: income at the third threshold
    // ==========================================================================
    #[test]
    fn test_tax_005_exactly_at_third_threshold() {
        let result = calculate_annual_tax(dec("500000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("94000000"));
    }

    // ==========================================================================
    // TAX-006: income in the unbounded top bracket
    // ==========================================================================
    #[test]
    fn test_tax_006_top_bracket() {
        let result = calculate_annual_tax(dec("600000000"), &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, dec("124000000"));
    }

    // ==========================================================================
    // TAX-007: zero income, zero tax
    // ==========================================================================
    #[test]
    fn test_tax_007_zero_income() {
        let result = calculate_annual_tax(Decimal::ZERO, &standard_brackets(), 1).unwrap();
        assert_eq!(result.annual_tax, Decimal::ZERO);
    }

    // ==========================================================================
    // TAX-008: monthly tax round trip through annualisation
    // ==========================================================================
    #[test]
    fn test_tax_008_monthly_tax() {
        let result = calculate_monthly_tax(dec("5000000"), &standard_brackets(), 1).unwrap();

        assert_eq!(result.annualised_income, dec("60000000"));
        assert_eq!(result.annual_tax, dec("3000000"));
        assert_eq!(result.monthly_tax, dec("250000"));
    }

    // ==========================================================================
    // TAX-009: monthly tax with non-terminating division keeps precision
    // ==========================================================================
    #[test]
    fn test_tax_009_monthly_tax_full_precision() {
        // 25M monthly annualises to 300M: 31.5M + 25% of 50M = 44M annual
        let result = calculate_monthly_tax(dec("25000000"), &standard_brackets(), 1).unwrap();

        assert_eq!(result.annual_tax, dec("44000000"));
        assert_eq!(result.monthly_tax, dec("44000000") / dec("12"));
    }

    #[test]
    fn test_negative_income_rejected() {
        let result = calculate_annual_tax(dec("-1"), &standard_brackets(), 1);
        match result {
            Err(EngineError::Validation { field, .. }) => {
                assert_eq!(field, "annual_income");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_negative_monthly_gross_rejected() {
        let result = calculate_monthly_tax(dec("-1"), &standard_brackets(), 1);
        match result {
            Err(EngineError::Validation { field, .. }) => {
                assert_eq!(field, "monthly_gross");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let result = calculate_annual_tax(dec("1000"), &[], 1);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_audit_breakdown_lists_touched_brackets() {
        let result = calculate_annual_tax(dec("120000000"), &standard_brackets(), 1).unwrap();

        let brackets = result.audit_step.output["brackets"].as_array().unwrap();
        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0]["tax"].as_str().unwrap(), "3000000");
        assert_eq!(brackets[1]["taxable"].as_str().unwrap(), "60000000");
    }

    #[test]
    fn test_audit_step_clause_ref() {
        let result = calculate_annual_tax(dec("1000"), &standard_brackets(), 3).unwrap();
        assert_eq!(result.audit_step.clause_ref, "UU 7/2021 Pasal 17");
        assert_eq!(result.audit_step.step_number, 3);
    }

    proptest! {
        /// Tax never decreases as income rises.
        #[test]
        fn prop_tax_monotonic_in_income(a in 0i64..=2_000_000_000, b in 0i64..=2_000_000_000) {
            let brackets = standard_brackets();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };

            let low_tax = calculate_annual_tax(Decimal::from(low), &brackets, 1)
                .unwrap()
                .annual_tax;
            let high_tax = calculate_annual_tax(Decimal::from(high), &brackets, 1)
                .unwrap()
                .annual_tax;

            prop_assert!(low_tax <= high_tax);
        }

        /// Effective rate never exceeds the top marginal rate.
        #[test]
        fn prop_effective_rate_bounded(income in 1i64..=2_000_000_000) {
            let brackets = standard_brackets();
            let annual_income = Decimal::from(income);

            let tax = calculate_annual_tax(annual_income, &brackets, 1)
                .unwrap()
                .annual_tax;

            prop_assert!(tax >= Decimal::ZERO);
            prop_assert!(tax <= annual_income * dec("0.30"));
        }
    }
}
