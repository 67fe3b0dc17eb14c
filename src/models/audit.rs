//! Audit trail models for the HRIS engine.
//!
//! Every calculation records the decisions it makes as a sequence of
//! [`AuditStep`]s so a payroll officer can verify how a figure was derived.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statutory or policy clause for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation or a ledger mutation.
///
/// Warnings indicate conditions that don't prevent the operation
/// but may require attention, such as a leave quota going negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// Records every decision made during the calculation process for
/// transparency toward employees and payroll review.
///
/// # Example
///
/// ```
/// use hris_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "gross_salary".to_string(),
            rule_name: "Gross Salary".to_string(),
            clause_ref: "payroll.gross".to_string(),
            input: serde_json::json!({"basic_salary": "15000000"}),
            output: serde_json::json!({"gross_salary": "17000000"}),
            reasoning: "Summed basic salary, allowances and overtime pay".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"gross_salary\""));
        assert!(json.contains("\"rule_name\":\"Gross Salary\""));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "negative_remaining".to_string(),
            message: "Remaining leave quota is -2 days".to_string(),
            severity: "medium".to_string(),
        };

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"negative_remaining\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }

    #[test]
    fn test_audit_trace_serialization() {
        let trace = AuditTrace {
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "income_tax".to_string(),
                rule_name: "Progressive Income Tax".to_string(),
                clause_ref: "PPh 21".to_string(),
                input: serde_json::json!({}),
                output: serde_json::json!({}),
                reasoning: "Test reasoning".to_string(),
            }],
            warnings: vec![],
            duration_us: 1234,
        };

        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"duration_us\":1234"));
        assert!(json.contains("\"steps\":["));
        assert!(json.contains("\"warnings\":["));
    }

    #[test]
    fn test_audit_trace_round_trip() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning {
                code: "negative_remaining".to_string(),
                message: "quota shrunk below usage".to_string(),
                severity: "medium".to_string(),
            }],
            duration_us: 42,
        };

        let json = serde_json::to_string(&trace).unwrap();
        let deserialized: AuditTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(trace, deserialized);
    }

    #[test]
    fn test_audit_steps_ordered() {
        let steps: Vec<AuditStep> = (1..=3)
            .map(|n| AuditStep {
                step_number: n,
                rule_id: format!("rule_{:03}", n),
                rule_name: format!("Step {}", n),
                clause_ref: "payroll".to_string(),
                input: serde_json::json!({}),
                output: serde_json::json!({}),
                reasoning: String::new(),
            })
            .collect();

        let trace = AuditTrace {
            steps,
            warnings: vec![],
            duration_us: 1000,
        };

        let step_numbers: Vec<u32> = trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(step_numbers, vec![1, 2, 3]);
    }
}
