//! HTTP request handlers for the HRIS engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{assess_achievement, calculate_payroll, resolve_work_interval};
use crate::error::EngineError;
use crate::models::PayrollInputs;

use super::request::{
    AttendancePunchRequest, KpiRequest, LeaveSubmissionRequest, NewEmployeeRequest,
    PayrollInputsRequest, PayrollRunRequest, QuotaUpdateRequest, ResolveIntervalRequest,
    StageDecisionRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceResponse, EmployeeResponse, LeaveDecisionResponse,
    PayrollCalculationResponse, PayrollRecordResponse, PayrollRunResponse, QuotaUpdateResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_payroll_handler))
        .route("/payroll/run", post(run_payroll_handler))
        .route("/payroll/records/:id", put(update_payroll_record_handler))
        .route("/attendance/resolve", post(resolve_interval_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/leave/requests", post(submit_leave_handler))
        .route("/leave/requests/:id/stage1", post(stage_one_handler))
        .route("/leave/requests/:id/stage2", post(stage_two_handler))
        .route("/employees", post(register_employee_handler))
        .route("/employees/:id", get(get_employee_handler))
        .route("/employees/:id/quota", put(set_quota_handler))
        .route("/kpi/achievement", post(kpi_handler))
        .with_state(state)
}

/// Unwraps a JSON payload, turning extraction failures into the 400
/// response the API promises.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response())
        }
    }
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    let api_error: ApiErrorResponse = error.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Handler for the POST /payroll/calculate endpoint.
///
/// Accepts payroll inputs and returns every derived figure with the
/// full audit trace.
async fn calculate_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollInputsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let inputs: PayrollInputs = request.into();

    match calculate_payroll(&inputs, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                gross_salary = %result.computation.gross_salary,
                net_salary = %result.computation.net_salary,
                duration_us = result.audit.duration_us,
                "Payroll calculation completed successfully"
            );
            json_ok(PayrollCalculationResponse {
                calculation_id: Uuid::new_v4(),
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                inputs,
                computation: result.computation,
                audit_trace: result.audit,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /payroll/run endpoint.
///
/// Runs payroll for a period over every active employee in the store.
async fn run_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.run_payroll(request.period, state.config()) {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                period = %request.period,
                count = records.len(),
                "Payroll run completed successfully"
            );
            json_ok(PayrollRunResponse {
                period: request.period,
                count: records.len(),
                records,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the PUT /payroll/records/{id} endpoint.
///
/// Replaces a record's inputs and recomputes every derived figure.
async fn update_payroll_record_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<PayrollInputsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        record_id = %record_id,
        "Processing payroll record update"
    );

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.update_payroll_record(&record_id, request.into(), state.config()) {
        Ok(updated) => {
            info!(
                correlation_id = %correlation_id,
                record_id = %record_id,
                net_salary = %updated.record.computation.net_salary,
                "Payroll record updated successfully"
            );
            json_ok(PayrollRecordResponse {
                record: updated.record,
                audit_trace: updated.audit,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /attendance/resolve endpoint.
///
/// Resolves a pair of punches into payable, regular and overtime
/// hours without touching the store.
async fn resolve_interval_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResolveIntervalRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing interval resolution request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let resolution = resolve_work_interval(
        request.check_in,
        request.check_out,
        state.config().attendance_rules(),
        1,
    );
    info!(
        correlation_id = %correlation_id,
        work_hours = %resolution.work_hours,
        overtime_hours = %resolution.overtime_hours,
        "Interval resolved successfully"
    );
    json_ok(resolution)
}

/// Handler for the POST /attendance/check-in endpoint.
async fn check_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendancePunchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-in request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.check_in(&request.employee_id, request.date, request.time) {
        Ok(attendance) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                date = %request.date,
                "Check-in recorded successfully"
            );
            json_ok(AttendanceResponse {
                attendance,
                resolution: None,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /attendance/check-out endpoint.
///
/// Records the punch and resolves the day's hours.
async fn check_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendancePunchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-out request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.check_out(
        &request.employee_id,
        request.date,
        request.time,
        state.config(),
    ) {
        Ok(resolved) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                date = %request.date,
                work_hours = %resolved.resolution.work_hours,
                "Check-out recorded successfully"
            );
            json_ok(AttendanceResponse {
                attendance: resolved.attendance,
                resolution: Some(resolved.resolution),
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /leave/requests endpoint.
///
/// Validates and opens a leave request with both stages pending.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveSubmissionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave request submission");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.submit_leave_request(
        &request.employee_id,
        request.leave_type,
        request.start_date,
        request.end_date,
        &request.reason,
        state.config(),
    ) {
        Ok(opening) => {
            info!(
                correlation_id = %correlation_id,
                request_id = %opening.request.id,
                total_days = opening.request.total_days,
                "Leave request opened successfully"
            );
            json_ok(opening)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /leave/requests/{id}/stage1 endpoint.
async fn stage_one_handler(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    payload: Result<Json<StageDecisionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        request_id = %request_id,
        "Processing stage-one decision"
    );

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.decide_stage_one(&request_id, request.decision) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                request_id = %request_id,
                "Stage-one decision recorded successfully"
            );
            json_ok(LeaveDecisionResponse {
                request: record.request,
                quota: record.quota,
                steps: record.steps,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /leave/requests/{id}/stage2 endpoint.
///
/// An approval here finalises the request and debits the quota for
/// quota-drawing leave types, in one atomic store operation.
async fn stage_two_handler(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    payload: Result<Json<StageDecisionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        request_id = %request_id,
        "Processing stage-two decision"
    );

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.decide_stage_two(&request_id, request.decision) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                request_id = %request_id,
                debited = record.quota.is_some(),
                "Stage-two decision recorded successfully"
            );
            json_ok(LeaveDecisionResponse {
                request: record.request,
                quota: record.quota,
                steps: record.steps,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /employees endpoint.
async fn register_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployeeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing employee registration");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.register_employee(request.into(), state.config()) {
        Ok(employee) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                "Employee registered successfully"
            );
            json_ok(EmployeeResponse::from_employee(employee))
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the GET /employees/{id} endpoint.
async fn get_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let store = state.store().read().await;
    match store.employee(&employee_id) {
        Ok(employee) => json_ok(EmployeeResponse::from_employee(employee.clone())),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the PUT /employees/{id}/quota endpoint.
async fn set_quota_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<QuotaUpdateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing quota update"
    );

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut store = state.store().write().await;
    match store.set_annual_quota(&employee_id, request.annual_leave_quota) {
        Ok(change) => {
            if let Some(warning) = &change.mutation.warning {
                warn!(
                    correlation_id = %correlation_id,
                    employee_id = %employee_id,
                    code = %warning.code,
                    "Quota update raised a warning"
                );
            }
            json_ok(QuotaUpdateResponse {
                employee: change.employee,
                mutation: change.mutation,
            })
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for the POST /kpi/achievement endpoint.
async fn kpi_handler(
    State(_state): State<AppState>,
    payload: Result<Json<KpiRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing KPI assessment request");

    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match assess_achievement(request.actual, request.target, 1) {
        Ok(assessment) => {
            info!(
                correlation_id = %correlation_id,
                percentage = %assessment.percentage,
                "KPI assessed successfully"
            );
            json_ok(assessment)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}
