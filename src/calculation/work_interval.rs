//! Work interval resolution functionality.
//!
//! This module resolves a pair of clock punches into payable hours,
//! applying the midnight-crossing rule, the unpaid break deduction, and
//! the split into regular and overtime hours.

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::AttendanceRules;
use crate::models::AuditStep;

/// Statutory reference for daily working hours and rest breaks.
const WORKING_TIME_CLAUSE: &str = "UU 13/2003 Pasal 77, 79(2)";

/// Minutes in a full day, added when an interval crosses midnight.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Default hours per day paid at the regular rate.
pub const DEFAULT_DAILY_REGULAR_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default worked-hours threshold that triggers the unpaid break deduction.
pub const DEFAULT_BREAK_THRESHOLD_HOURS: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Default length of the unpaid break once triggered.
pub const DEFAULT_BREAK_DEDUCTION_HOURS: Decimal = Decimal::from_parts(1, 0, 0, false, 0);

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// The result of resolving a check-in/check-out pair into payable hours.
///
/// Contains the rounded hour figures along with the audit step
/// documenting the resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkIntervalResolution {
    /// Payable hours after break deduction, rounded to 2 decimal places.
    pub work_hours: Decimal,
    /// Hours up to the daily regular cap.
    pub regular_hours: Decimal,
    /// Hours beyond the daily regular cap.
    pub overtime_hours: Decimal,
    /// True when check-out fell on the day after check-in.
    pub crossed_midnight: bool,
    /// True when the unpaid break was deducted.
    pub break_deducted: bool,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Resolves a check-in/check-out pair into regular and overtime hours.
///
/// The interval length is the minute difference between the punches; a
/// strictly negative difference means the shift ended past midnight and
/// gains a full day. Intervals longer than the break threshold lose the
/// unpaid break. The result is rounded to 2 decimal places (midpoints
/// away from zero) before being split at the daily regular cap, so
/// `regular_hours + overtime_hours == work_hours` exactly.
///
/// # Arguments
///
/// * `check_in` - Clock-in time of day
/// * `check_out` - Clock-out time of day
/// * `rules` - Attendance resolution rules (caps and break policy)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// A [`WorkIntervalResolution`] containing:
/// - `work_hours`: Payable hours after the break deduction
/// - `regular_hours`: Hours up to the daily regular cap
/// - `overtime_hours`: Hours beyond the cap (can be zero)
/// - `audit_step`: Documentation of the resolution
///
/// # Examples
///
/// ## Ordinary day shift with break deduction
///
/// ```
/// use hris_engine::calculation::resolve_work_interval;
/// use hris_engine::config::AttendanceRules;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rules = AttendanceRules {
///     daily_regular_hours: Decimal::from_str("8").unwrap(),
///     break_threshold_hours: Decimal::from_str("6").unwrap(),
///     break_deduction_hours: Decimal::from_str("1").unwrap(),
/// };
/// let check_in = NaiveTime::parse_from_str("08:00", "%H:%M").unwrap();
/// let check_out = NaiveTime::parse_from_str("18:00", "%H:%M").unwrap();
///
/// let result = resolve_work_interval(check_in, check_out, &rules, 1);
///
/// assert_eq!(result.work_hours, Decimal::from_str("9").unwrap());
/// assert_eq!(result.regular_hours, Decimal::from_str("8").unwrap());
/// assert_eq!(result.overtime_hours, Decimal::from_str("1").unwrap());
/// ```
///
/// ## Overnight shift
///
/// ```
/// use hris_engine::calculation::resolve_work_interval;
/// use hris_engine::config::AttendanceRules;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rules = AttendanceRules {
///     daily_regular_hours: Decimal::from_str("8").unwrap(),
///     break_threshold_hours: Decimal::from_str("6").unwrap(),
///     break_deduction_hours: Decimal::from_str("1").unwrap(),
/// };
/// let check_in = NaiveTime::parse_from_str("22:00", "%H:%M").unwrap();
/// let check_out = NaiveTime::parse_from_str("06:00", "%H:%M").unwrap();
///
/// let result = resolve_work_interval(check_in, check_out, &rules, 1);
///
/// assert!(result.crossed_midnight);
/// assert_eq!(result.work_hours, Decimal::from_str("7").unwrap());
/// ```
pub fn resolve_work_interval(
    check_in: NaiveTime,
    check_out: NaiveTime,
    rules: &AttendanceRules,
    step_number: u32,
) -> WorkIntervalResolution {
    // A strictly negative difference means check-out fell on the next day.
    // An equal pair stays at zero minutes.
    let mut minutes = (check_out - check_in).num_minutes();
    let crossed_midnight = minutes < 0;
    if crossed_midnight {
        minutes += MINUTES_PER_DAY;
    }

    let raw_hours = Decimal::from(minutes) / MINUTES_PER_HOUR;

    // The unpaid break applies only above the threshold, never at it.
    let break_deducted = raw_hours > rules.break_threshold_hours;
    let net_hours = if break_deducted {
        raw_hours - rules.break_deduction_hours
    } else {
        raw_hours
    };

    // Round before splitting so the split halves sum to work_hours exactly.
    let work_hours = net_hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let regular_hours = if work_hours <= rules.daily_regular_hours {
        work_hours
    } else {
        rules.daily_regular_hours
    };
    let overtime_hours = if work_hours > rules.daily_regular_hours {
        work_hours - rules.daily_regular_hours
    } else {
        Decimal::ZERO
    };

    let mut reasoning = format!(
        "{} minutes between {} and {}",
        minutes,
        check_in.format("%H:%M"),
        check_out.format("%H:%M")
    );
    if crossed_midnight {
        reasoning.push_str(" (check-out on the following day)");
    }
    if break_deducted {
        reasoning.push_str(&format!(
            "; {} hour unpaid break deducted above the {} hour threshold",
            rules.break_deduction_hours.normalize(),
            rules.break_threshold_hours.normalize()
        ));
    }
    reasoning.push_str(&format!(
        "; {} payable hours split into {} regular and {} overtime",
        work_hours.normalize(),
        regular_hours.normalize(),
        overtime_hours.normalize()
    ));

    let audit_step = AuditStep {
        step_number,
        rule_id: "work_interval_resolution".to_string(),
        rule_name: "Work Interval Resolution".to_string(),
        clause_ref: WORKING_TIME_CLAUSE.to_string(),
        input: serde_json::json!({
            "check_in": check_in.format("%H:%M").to_string(),
            "check_out": check_out.format("%H:%M").to_string(),
            "daily_regular_hours": rules.daily_regular_hours.normalize().to_string(),
            "break_threshold_hours": rules.break_threshold_hours.normalize().to_string(),
            "break_deduction_hours": rules.break_deduction_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "work_hours": work_hours.normalize().to_string(),
            "regular_hours": regular_hours.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "crossed_midnight": crossed_midnight,
            "break_deducted": break_deducted
        }),
        reasoning,
    };

    WorkIntervalResolution {
        work_hours,
        regular_hours,
        overtime_hours,
        crossed_midnight,
        break_deducted,
        audit_step,
    }
}
