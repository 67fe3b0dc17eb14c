//! KPI achievement assessment functionality.
//!
//! This module turns a target/actual pair into an achievement percentage
//! and places it into one of four performance bands.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Reference for the internal performance banding policy.
const KPI_POLICY_CLAUSE: &str = "Internal KPI Policy 2.1";

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const NINETY: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const EIGHTY: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Performance band for an achievement percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementBand {
    /// At or above 100 percent.
    Achieved,
    /// At or above 90 percent but under 100.
    NearTarget,
    /// At or above 80 percent but under 90.
    NeedsAttention,
    /// Under 80 percent.
    BelowTarget,
}

impl AchievementBand {
    /// Places a percentage into its band.
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage >= HUNDRED {
            AchievementBand::Achieved
        } else if percentage >= NINETY {
            AchievementBand::NearTarget
        } else if percentage >= EIGHTY {
            AchievementBand::NeedsAttention
        } else {
            AchievementBand::BelowTarget
        }
    }
}

/// The result of assessing a KPI achievement, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiAssessment {
    /// Achievement percentage at full precision.
    pub percentage: Decimal,
    /// Performance band for the percentage.
    pub band: AchievementBand,
    /// The audit step recording this assessment.
    pub audit_step: AuditStep,
}

/// Assesses an actual value against its target.
///
/// The percentage is `actual / target * 100`. A zero target yields zero
/// percent by convention rather than an error, so dashboards can render
/// unset targets.
///
/// # Arguments
///
/// * `actual` - Measured value
/// * `target` - Target value
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a [`KpiAssessment`] on success, or a `Validation` error when
/// either value is negative.
///
/// # Examples
///
/// ```
/// use hris_engine::calculation::{assess_achievement, AchievementBand};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let actual = Decimal::from_str("95").unwrap();
/// let target = Decimal::from_str("100").unwrap();
///
/// let result = assess_achievement(actual, target, 1).unwrap();
///
/// assert_eq!(result.percentage, Decimal::from_str("95").unwrap());
/// assert_eq!(result.band, AchievementBand::NearTarget);
/// ```
pub fn assess_achievement(
    actual: Decimal,
    target: Decimal,
    step_number: u32,
) -> EngineResult<KpiAssessment> {
    if actual < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "actual".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if target < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: "target".to_string(),
            message: "must not be negative".to_string(),
        });
    }

    // Zero target reads as zero percent by convention, not an error.
    let percentage = if target == Decimal::ZERO {
        Decimal::ZERO
    } else {
        actual / target * HUNDRED
    };
    let band = AchievementBand::from_percentage(percentage);

    let reasoning = if target == Decimal::ZERO {
        "Zero target reads as 0% achievement by convention".to_string()
    } else {
        format!(
            "{} of {} reaches {}%",
            actual.normalize(),
            target.normalize(),
            percentage.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "kpi_achievement".to_string(),
        rule_name: "KPI Achievement".to_string(),
        clause_ref: KPI_POLICY_CLAUSE.to_string(),
        input: serde_json::json!({
            "actual": actual.normalize().to_string(),
            "target": target.normalize().to_string()
        }),
        output: serde_json::json!({
            "percentage": percentage.normalize().to_string(),
            "band": band
        }),
        reasoning,
    };

    Ok(KpiAssessment {
        percentage,
        band,
        audit_step,
    })
}
