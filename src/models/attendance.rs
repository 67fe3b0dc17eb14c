//! Daily attendance model.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The lifecycle state of a daily attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// No punch recorded for the day.
    NotCheckedIn,
    /// Check-in recorded, check-out still open.
    CheckedIn,
    /// Both punches recorded and hours resolved.
    CheckedOut,
}

/// Represents one employee's attendance for one calendar day.
///
/// Hours fields stay `None` until both punches exist and the record has
/// been resolved; they are populated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAttendance {
    /// Unique identifier for the record.
    pub id: String,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The employee's name at punch time.
    pub employee_name: String,
    /// The calendar day the punches fall on (the check-in day).
    pub date: NaiveDate,
    /// Clock-in time of day.
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    /// Clock-out time of day. May be earlier than check-in when the
    /// shift ends past midnight.
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    /// Payable hours after break deduction, rounded to 2 decimal places.
    #[serde(default)]
    pub work_hours: Option<Decimal>,
    /// Hours up to the daily regular cap.
    #[serde(default)]
    pub regular_hours: Option<Decimal>,
    /// Hours beyond the daily regular cap.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Current lifecycle state.
    pub status: AttendanceStatus,
}

impl DailyAttendance {
    /// Creates a fresh record with no punches for the given day.
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            date,
            check_in: None,
            check_out: None,
            work_hours: None,
            regular_hours: None,
            overtime_hours: None,
            status: AttendanceStatus::NotCheckedIn,
        }
    }

    /// Returns true once hours have been resolved from both punches.
    pub fn is_resolved(&self) -> bool {
        self.status == AttendanceStatus::CheckedOut
    }
}
