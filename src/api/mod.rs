//! HTTP API module for the HRIS engine.
//!
//! This module provides the REST API endpoints for payroll calculation,
//! attendance, leave administration and KPI assessment.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendancePunchRequest, KpiRequest, LeaveSubmissionRequest, NewEmployeeRequest,
    PayrollInputsRequest, PayrollRunRequest, QuotaUpdateRequest, ResolveIntervalRequest,
    StageDecisionRequest,
};
pub use response::{
    ApiError, AttendanceResponse, EmployeeResponse, LeaveDecisionResponse,
    PayrollCalculationResponse, PayrollRecordResponse, PayrollRunResponse, QuotaUpdateResponse,
};
pub use state::AppState;
