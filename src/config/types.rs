//! Configuration types for payroll and leave policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Metadata about the policy bundle.
///
/// Contains identifying information about the policy set an engine
/// instance runs with.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyMetadata {
    /// The human-readable name of the policy bundle.
    pub name: String,
    /// The version or effective date of the bundle.
    pub version: String,
    /// ISO country code the statutory rules apply to.
    pub region: String,
    /// ISO currency code all amounts are denominated in.
    pub currency: String,
}

/// One bracket of the progressive income tax schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of annual income covered by this bracket.
    /// Absent on the final, unbounded bracket.
    #[serde(default)]
    pub upper_annual: Option<Decimal>,
    /// Marginal rate applied to income falling inside this bracket.
    pub rate: Decimal,
}

/// Progressive tax schedule from tax.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Reference to the statutory article defining the schedule.
    pub clause: String,
    /// Brackets ordered lowest threshold first; the last is unbounded.
    pub brackets: Vec<TaxBracket>,
}

/// Statutory contribution rates from contributions.yaml.
///
/// Both contributions are assessed on basic salary only, not gross.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsConfig {
    /// Reference to the statutory article defining the rates.
    pub clause: String,
    /// Health insurance rate as a fraction of basic salary.
    pub kesehatan_rate: Decimal,
    /// Employment insurance rate as a fraction of basic salary.
    pub ketenagakerjaan_rate: Decimal,
}

/// Attendance resolution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRules {
    /// Hours per day paid at the regular rate; the rest is overtime.
    pub daily_regular_hours: Decimal,
    /// Worked hours above this trigger the unpaid break deduction.
    pub break_threshold_hours: Decimal,
    /// Hours deducted for the unpaid break once triggered.
    pub break_deduction_hours: Decimal,
}

/// Working-time rules from work.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkConfig {
    /// Reference to the statutory article defining overtime pay.
    pub clause: String,
    /// Divisor converting monthly basic salary to an hourly rate.
    pub monthly_divisor_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
    /// Daily attendance resolution rules.
    pub attendance: AttendanceRules,
}

/// Approver titles for the two decision stages.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalStages {
    /// Title of the first-stage approver.
    pub stage_one_title: String,
    /// Title of the second-stage approver.
    pub stage_two_title: String,
}

/// Leave policy from leave.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveConfig {
    /// Reference to the statutory article granting annual leave.
    pub clause: String,
    /// Annual leave days granted to a newly registered employee.
    pub default_annual_quota: u32,
    /// Approver titles for the two stages.
    pub stages: ApprovalStages,
}

/// The complete policy bundle loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a policy configuration directory.
#[derive(Debug, Clone)]
pub struct HrPolicy {
    /// Policy metadata.
    metadata: PolicyMetadata,
    /// Progressive tax schedule.
    tax: TaxConfig,
    /// Statutory contribution rates.
    contributions: ContributionsConfig,
    /// Working-time rules.
    work: WorkConfig,
    /// Leave policy.
    leave: LeaveConfig,
}

impl HrPolicy {
    /// Creates a new HrPolicy from its component parts.
    ///
    /// Validates the tax schedule (ascending thresholds, exactly one
    /// unbounded final bracket), all rates within `0..=1`, and positive
    /// working-time divisors. Returns `ConfigParseError` naming the
    /// offending file when a rule is violated.
    pub fn new(
        metadata: PolicyMetadata,
        tax: TaxConfig,
        contributions: ContributionsConfig,
        work: WorkConfig,
        leave: LeaveConfig,
    ) -> EngineResult<Self> {
        Self::validate_tax(&tax)?;
        Self::validate_contributions(&contributions)?;
        Self::validate_work(&work)?;
        Ok(Self {
            metadata,
            tax,
            contributions,
            work,
            leave,
        })
    }

    fn validate_tax(tax: &TaxConfig) -> EngineResult<()> {
        let parse_error = |message: String| EngineError::ConfigParseError {
            path: "tax.yaml".to_string(),
            message,
        };

        if tax.brackets.is_empty() {
            return Err(parse_error("tax schedule has no brackets".to_string()));
        }

        let mut previous_upper: Option<Decimal> = None;
        for (index, bracket) in tax.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(parse_error(format!(
                    "bracket {} rate {} is outside 0..=1",
                    index, bracket.rate
                )));
            }

            let is_last = index == tax.brackets.len() - 1;
            match bracket.upper_annual {
                Some(upper) => {
                    if is_last {
                        return Err(parse_error(
                            "final bracket must be unbounded (no upper_annual)".to_string(),
                        ));
                    }
                    if let Some(previous) = previous_upper {
                        if upper <= previous {
                            return Err(parse_error(format!(
                                "bracket {} upper bound {} does not exceed previous bound {}",
                                index, upper, previous
                            )));
                        }
                    }
                    previous_upper = Some(upper);
                }
                None => {
                    if !is_last {
                        return Err(parse_error(format!(
                            "bracket {} is unbounded but not last",
                            index
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_contributions(contributions: &ContributionsConfig) -> EngineResult<()> {
        let in_range = |rate: Decimal| rate >= Decimal::ZERO && rate <= Decimal::ONE;
        if !in_range(contributions.kesehatan_rate) || !in_range(contributions.ketenagakerjaan_rate)
        {
            return Err(EngineError::ConfigParseError {
                path: "contributions.yaml".to_string(),
                message: "contribution rates must be within 0..=1".to_string(),
            });
        }
        Ok(())
    }

    fn validate_work(work: &WorkConfig) -> EngineResult<()> {
        let parse_error = |message: &str| EngineError::ConfigParseError {
            path: "work.yaml".to_string(),
            message: message.to_string(),
        };

        if work.monthly_divisor_hours <= Decimal::ZERO {
            return Err(parse_error("monthly_divisor_hours must be positive"));
        }
        if work.overtime_multiplier <= Decimal::ZERO {
            return Err(parse_error("overtime_multiplier must be positive"));
        }
        if work.attendance.daily_regular_hours <= Decimal::ZERO {
            return Err(parse_error("daily_regular_hours must be positive"));
        }
        if work.attendance.break_deduction_hours < Decimal::ZERO {
            return Err(parse_error("break_deduction_hours must not be negative"));
        }
        Ok(())
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the progressive tax schedule.
    pub fn tax(&self) -> &TaxConfig {
        &self.tax
    }

    /// Returns the statutory contribution rates.
    pub fn contributions(&self) -> &ContributionsConfig {
        &self.contributions
    }

    /// Returns the working-time rules.
    pub fn work(&self) -> &WorkConfig {
        &self.work
    }

    /// Returns the leave policy.
    pub fn leave(&self) -> &LeaveConfig {
        &self.leave
    }
}
