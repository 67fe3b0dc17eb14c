//! Response types for the HRIS engine API.
//!
//! This module defines the success envelopes shared by the endpoints
//! plus the error response structures and the mapping from engine
//! errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::WorkIntervalResolution;
use crate::error::EngineError;
use crate::leave::QuotaMutation;
use crate::models::{
    AuditStep, AuditTrace, DailyAttendance, Employee, LeaveRequest, PayPeriod, PayrollComputation,
    PayrollInputs, PayrollRecord,
};

/// Response body for `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollCalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// The inputs the calculation ran over.
    pub inputs: PayrollInputs,
    /// Every derived payroll figure.
    pub computation: PayrollComputation,
    /// The audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// Response body for `POST /payroll/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunResponse {
    /// The period that was run.
    pub period: PayPeriod,
    /// How many records the run produced.
    pub count: usize,
    /// The records, in employee-id order.
    pub records: Vec<PayrollRecord>,
}

/// Response body for `PUT /payroll/records/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecordResponse {
    /// The record with recomputed figures.
    pub record: PayrollRecord,
    /// The audit trace of the recomputation.
    pub audit_trace: AuditTrace,
}

/// Response body for the attendance punch endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// The attendance record after the punch.
    pub attendance: DailyAttendance,
    /// The interval resolution, present once the day is checked out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<WorkIntervalResolution>,
}

/// Response body for the leave decision endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDecisionResponse {
    /// The request after the decision.
    pub request: LeaveRequest,
    /// The quota mutation applied with the decision, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaMutation>,
    /// The audit steps for the decision and any debit, in order.
    pub steps: Vec<AuditStep>,
}

/// Response body for `PUT /employees/{id}/quota`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaUpdateResponse {
    /// The employee after the change.
    pub employee: Employee,
    /// The ledger mutation, including any negative-remaining warning.
    pub mutation: QuotaMutation,
}

/// Response body for the employee endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    /// The stored employee record.
    pub employee: Employee,
    /// The derived remaining leave quota.
    pub remaining_leave_quota: i64,
}

impl EmployeeResponse {
    /// Builds the response from a stored employee, deriving the
    /// remaining quota.
    pub fn from_employee(employee: Employee) -> Self {
        let remaining_leave_quota = employee.remaining_leave_quota();
        Self {
            employee,
            remaining_leave_quota,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Validation failed for '{}': {}", field, message),
                    "The request contains invalid information",
                ),
            },
            EngineError::InvalidStateTransition { id, message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "INVALID_STATE",
                    format!("Invalid state transition for '{}': {}", id, message),
                    "The record's current state does not allow this operation",
                ),
            },
            EngineError::NotFound { entity, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", format!("{} not found: {}", entity, id)),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
            EngineError::StorageError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "STORAGE_ERROR",
                    "Failed to persist the change",
                    message,
                ),
            },
        }
    }
}
