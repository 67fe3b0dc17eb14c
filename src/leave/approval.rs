//! Two-stage leave approval state machine.
//!
//! Stage one decides first; stage two only becomes legal once stage one
//! has approved. A rejection at either stage is terminal, and a request
//! that reached a terminal status accepts no further decisions. The
//! quota debit is signalled exactly once, on the transition into the
//! approved status, and only for leave types that draw on the quota.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalStatus, AuditStep, LeaveRequest};

/// Internal policy reference for the approval chain.
const APPROVAL_POLICY_CLAUSE: &str = "Internal Leave Policy 4.1, 4.2";

/// A decision an approver can record on a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the stage.
    Approve,
    /// Reject the stage, terminating the request.
    Reject,
}

/// The result of recording a stage decision, including the audit step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    /// The request with the decision applied and the overall status
    /// re-derived.
    pub request: LeaveRequest,
    /// Days to debit from the employee's quota. `Some` exactly when
    /// this decision moved the request into the approved status and the
    /// leave type draws on the quota.
    pub quota_debit_days: Option<u32>,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

fn status_name(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    }
}

fn ensure_open(request: &LeaveRequest) -> EngineResult<()> {
    if request.is_terminal() {
        return Err(EngineError::InvalidStateTransition {
            id: request.id.clone(),
            message: format!("request is already {}", status_name(request.status)),
        });
    }
    Ok(())
}

fn decision_step(
    request: &LeaveRequest,
    stage: &str,
    rule_name: &str,
    decision: Decision,
    quota_debit_days: Option<u32>,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: format!("leave_{}_decision", stage),
        rule_name: rule_name.to_string(),
        clause_ref: APPROVAL_POLICY_CLAUSE.to_string(),
        input: serde_json::json!({
            "request_id": request.id,
            "decision": decision,
            "leave_type": request.leave_type,
            "total_days": request.total_days
        }),
        output: serde_json::json!({
            "stage_one_status": request.stage_one.status,
            "stage_two_status": request.stage_two.status,
            "status": request.status,
            "quota_debit_days": quota_debit_days
        }),
        reasoning: match decision {
            Decision::Approve => format!(
                "{} approved; request is now {}",
                request_stage_title(request, stage),
                status_name(request.status)
            ),
            Decision::Reject => format!(
                "{} rejected; request is terminally rejected",
                request_stage_title(request, stage)
            ),
        },
    }
}

fn request_stage_title<'a>(request: &'a LeaveRequest, stage: &str) -> &'a str {
    if stage == "stage_one" {
        &request.stage_one.approver_title
    } else {
        &request.stage_two.approver_title
    }
}

/// Records the stage-one decision.
///
/// Approval leaves the request pending overall, waiting on stage two.
/// Rejection terminates the request immediately; stage two is never
/// consulted.
///
/// # Errors
///
/// Returns `InvalidStateTransition` when the request is already
/// terminal or stage one has already been decided.
pub fn decide_stage_one(
    request: &LeaveRequest,
    decision: Decision,
    step_number: u32,
) -> EngineResult<DecisionOutcome> {
    ensure_open(request)?;

    if request.stage_one.status != ApprovalStatus::Pending {
        return Err(EngineError::InvalidStateTransition {
            id: request.id.clone(),
            message: "stage 1 has already been decided".to_string(),
        });
    }

    let mut updated = request.clone();
    updated.stage_one.status = match decision {
        Decision::Approve => ApprovalStatus::Approved,
        Decision::Reject => ApprovalStatus::Rejected,
    };
    updated.stage_one.decided_at = Some(Utc::now());
    updated.status = updated.derived_status();

    let audit_step = decision_step(
        &updated,
        "stage_one",
        "Stage One Decision",
        decision,
        None,
        step_number,
    );

    Ok(DecisionOutcome {
        request: updated,
        quota_debit_days: None,
        audit_step,
    })
}

/// Records the stage-two decision.
///
/// Only legal once stage one has approved. Approval moves the request
/// into the approved status and, for quota-drawing leave types, signals
/// the debit of the request's day count. Rejection terminates the
/// request with no debit.
///
/// # Errors
///
/// Returns `InvalidStateTransition` when the request is already
/// terminal or stage one has not approved.
pub fn decide_stage_two(
    request: &LeaveRequest,
    decision: Decision,
    step_number: u32,
) -> EngineResult<DecisionOutcome> {
    ensure_open(request)?;

    if request.stage_one.status != ApprovalStatus::Approved {
        return Err(EngineError::InvalidStateTransition {
            id: request.id.clone(),
            message: "stage 2 requires stage 1 approval".to_string(),
        });
    }

    let mut updated = request.clone();
    updated.stage_two.status = match decision {
        Decision::Approve => ApprovalStatus::Approved,
        Decision::Reject => ApprovalStatus::Rejected,
    };
    updated.stage_two.decided_at = Some(Utc::now());
    updated.status = updated.derived_status();

    // The debit fires on this transition only; terminal requests refuse
    // further decisions, so it cannot fire twice for one request.
    let quota_debit_days = if updated.status == ApprovalStatus::Approved
        && updated.leave_type.debits_quota()
    {
        Some(updated.total_days)
    } else {
        None
    };

    let audit_step = decision_step(
        &updated,
        "stage_two",
        "Stage Two Decision",
        decision,
        quota_debit_days,
        step_number,
    );

    Ok(DecisionOutcome {
        request: updated,
        quota_debit_days,
        audit_step,
    })
}
