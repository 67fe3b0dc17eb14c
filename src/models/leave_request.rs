//! Leave request model and related types.
//!
//! A leave request travels through two sequential approval stages. The
//! overall status is a pure function of the two stage slots; the helpers
//! here expose that derivation so the state machine can keep the stored
//! status consistent with it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The category of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave; debits the employee's quota on final approval.
    Annual,
    /// Sick leave; no quota debit.
    Sick,
    /// Personal leave; no quota debit.
    Personal,
    /// Unpaid leave; no quota debit.
    Unpaid,
}

impl LeaveType {
    /// Returns true if approving this leave type debits the annual quota.
    pub fn debits_quota(&self) -> bool {
        matches!(self, LeaveType::Annual)
    }
}

/// The status of an approval stage or of the request as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Not yet decided.
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
}

/// One of the two approval slots on a leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalSlot {
    /// The title of the approver responsible for this stage.
    pub approver_title: String,
    /// The decision recorded for this stage.
    pub status: ApprovalStatus,
    /// When the decision was recorded, if any.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalSlot {
    /// Creates an undecided slot for the given approver title.
    pub fn pending(approver_title: impl Into<String>) -> Self {
        Self {
            approver_title: approver_title.into(),
            status: ApprovalStatus::Pending,
            decided_at: None,
        }
    }
}

/// Represents a leave request and its two-stage approval state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee the leave is for.
    pub employee_id: String,
    /// The employee's name at submission time.
    pub employee_name: String,
    /// The category of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count between start and end.
    pub total_days: u32,
    /// Free-text justification supplied by the employee.
    pub reason: String,
    /// The overall request status, kept equal to [`derived_status`].
    ///
    /// [`derived_status`]: LeaveRequest::derived_status
    pub status: ApprovalStatus,
    /// The first approval stage.
    pub stage_one: ApprovalSlot,
    /// The second approval stage.
    pub stage_two: ApprovalSlot,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Derives the overall status from the two stage slots.
    ///
    /// Approved if and only if both stages approved; rejected as soon as
    /// either stage rejects; pending otherwise.
    pub fn derived_status(&self) -> ApprovalStatus {
        match (self.stage_one.status, self.stage_two.status) {
            (ApprovalStatus::Rejected, _) | (_, ApprovalStatus::Rejected) => {
                ApprovalStatus::Rejected
            }
            (ApprovalStatus::Approved, ApprovalStatus::Approved) => ApprovalStatus::Approved,
            _ => ApprovalStatus::Pending,
        }
    }

    /// Returns true if the request has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ApprovalStatus::Approved | ApprovalStatus::Rejected
        )
    }
}
