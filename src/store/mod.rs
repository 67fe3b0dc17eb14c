//! The HR record store.
//!
//! [`HrStore`] keeps every employee, leave request, attendance record
//! and payroll record in memory, keyed by id, and writes the whole
//! state through a [`SnapshotBackend`] after each mutating operation.
//! Each public method is one logical operation: it either completes and
//! flushes, or returns an error having changed nothing observable.
//!
//! Callers that share a store across tasks are expected to wrap it in a
//! `tokio::sync::RwLock`; holding the write lock for the duration of a
//! method call is what makes a stage-two approval and its quota debit
//! atomic.

mod backend;

pub use backend::{HrSnapshot, JsonFileBackend, MemoryBackend, SnapshotBackend};

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::calculation::{WorkIntervalResolution, calculate_payroll, resolve_work_interval};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::leave::{
    self, Decision, DecisionOutcome, QuotaMutation, RequestOpening,
};
use crate::models::{
    Allowances, AttendanceStatus, AuditStep, AuditTrace, DailyAttendance, Employee,
    EmployeeStatus, LeaveRequest, LeaveType, PayPeriod, PayrollInputs, PayrollRecord,
};

/// Input for registering a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// The employee's full name.
    pub name: String,
    /// Monthly basic salary in rupiah.
    pub basic_salary: Decimal,
    /// Fixed monthly allowances.
    pub allowances: Allowances,
    /// Annual leave quota in days. Falls back to the configured default
    /// when `None`.
    pub annual_leave_quota: Option<u32>,
}

/// An employee together with the quota mutation that was applied.
#[derive(Debug, Clone)]
pub struct QuotaChange {
    /// The employee after the change.
    pub employee: Employee,
    /// The ledger mutation, including any negative-remaining warning.
    pub mutation: QuotaMutation,
}

/// The stored result of a stage decision.
///
/// Stage one never carries a quota mutation. Stage two carries one
/// exactly when the decision moved the request into the approved status
/// and the leave type draws on the quota.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    /// The request after the decision.
    pub request: LeaveRequest,
    /// The quota debit applied with the decision, if any.
    pub quota: Option<QuotaMutation>,
    /// The audit steps for the decision and any debit, in order.
    pub steps: Vec<AuditStep>,
}

/// A resolved attendance record together with the interval resolution.
#[derive(Debug, Clone)]
pub struct AttendanceResolution {
    /// The record after check-out, with hours populated.
    pub attendance: DailyAttendance,
    /// The interval resolution that produced the hours.
    pub resolution: WorkIntervalResolution,
}

/// A payroll record after an edit, together with the fresh audit trace.
#[derive(Debug, Clone)]
pub struct RecordRecalculation {
    /// The record with recomputed figures.
    pub record: PayrollRecord,
    /// The audit trace of the recomputation.
    pub audit: AuditTrace,
}

/// The in-memory HR record store backed by a snapshot.
pub struct HrStore {
    employees: HashMap<String, Employee>,
    leave_requests: HashMap<String, LeaveRequest>,
    attendance: HashMap<String, DailyAttendance>,
    payroll_records: HashMap<String, PayrollRecord>,
    backend: Box<dyn SnapshotBackend>,
}

/// Upserts staged by a single operation, committed in one flush.
#[derive(Default)]
struct StagedWrites {
    employees: Vec<Employee>,
    leave_requests: Vec<LeaveRequest>,
    attendance: Vec<DailyAttendance>,
    payroll_records: Vec<PayrollRecord>,
}

impl HrStore {
    /// Opens a store over the given backend, loading any existing
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` when a snapshot exists but cannot be
    /// loaded.
    pub fn open(backend: Box<dyn SnapshotBackend>) -> EngineResult<Self> {
        let snapshot = backend.load()?.unwrap_or_default();

        let mut store = Self {
            employees: HashMap::new(),
            leave_requests: HashMap::new(),
            attendance: HashMap::new(),
            payroll_records: HashMap::new(),
            backend,
        };
        for employee in snapshot.employees {
            store.employees.insert(employee.id.clone(), employee);
        }
        for request in snapshot.leave_requests {
            store.leave_requests.insert(request.id.clone(), request);
        }
        for record in snapshot.attendance {
            store.attendance.insert(record.id.clone(), record);
        }
        for record in snapshot.payroll_records {
            store.payroll_records.insert(record.id.clone(), record);
        }
        Ok(store)
    }

    /// Creates an empty store over an in-memory backend.
    pub fn in_memory() -> Self {
        Self {
            employees: HashMap::new(),
            leave_requests: HashMap::new(),
            attendance: HashMap::new(),
            payroll_records: HashMap::new(),
            backend: Box::new(MemoryBackend::new()),
        }
    }

    /// Builds a snapshot of the current state, sorted by id.
    pub fn snapshot(&self) -> HrSnapshot {
        let mut employees: Vec<Employee> = self.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        let mut leave_requests: Vec<LeaveRequest> =
            self.leave_requests.values().cloned().collect();
        leave_requests.sort_by(|a, b| a.id.cmp(&b.id));
        let mut attendance: Vec<DailyAttendance> = self.attendance.values().cloned().collect();
        attendance.sort_by(|a, b| a.id.cmp(&b.id));
        let mut payroll_records: Vec<PayrollRecord> =
            self.payroll_records.values().cloned().collect();
        payroll_records.sort_by(|a, b| a.id.cmp(&b.id));

        HrSnapshot {
            employees,
            leave_requests,
            attendance,
            payroll_records,
        }
    }

    fn flush(&mut self) -> EngineResult<()> {
        let snapshot = self.snapshot();
        self.backend.save(&snapshot)
    }

    /// Applies staged upserts and flushes them as one snapshot. A
    /// failed save restores the prior entries, leaving nothing of the
    /// operation behind.
    fn commit(&mut self, writes: StagedWrites) -> EngineResult<()> {
        let mut prior_employees = Vec::with_capacity(writes.employees.len());
        for employee in writes.employees {
            let id = employee.id.clone();
            let prior = self.employees.insert(id.clone(), employee);
            prior_employees.push((id, prior));
        }
        let mut prior_requests = Vec::with_capacity(writes.leave_requests.len());
        for request in writes.leave_requests {
            let id = request.id.clone();
            let prior = self.leave_requests.insert(id.clone(), request);
            prior_requests.push((id, prior));
        }
        let mut prior_attendance = Vec::with_capacity(writes.attendance.len());
        for record in writes.attendance {
            let id = record.id.clone();
            let prior = self.attendance.insert(id.clone(), record);
            prior_attendance.push((id, prior));
        }
        let mut prior_records = Vec::with_capacity(writes.payroll_records.len());
        for record in writes.payroll_records {
            let id = record.id.clone();
            let prior = self.payroll_records.insert(id.clone(), record);
            prior_records.push((id, prior));
        }

        if let Err(err) = self.flush() {
            restore_entries(&mut self.employees, prior_employees);
            restore_entries(&mut self.leave_requests, prior_requests);
            restore_entries(&mut self.attendance, prior_attendance);
            restore_entries(&mut self.payroll_records, prior_records);
            return Err(err);
        }
        Ok(())
    }

    // ---- employees ----

    /// Registers a new employee and returns the stored record.
    ///
    /// The annual quota falls back to the configured default when the
    /// input leaves it unset.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when the name is empty or any
    /// monetary figure is negative.
    pub fn register_employee(
        &mut self,
        new: NewEmployee,
        config: &ConfigLoader,
    ) -> EngineResult<Employee> {
        if new.name.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        validate_non_negative("basic_salary", new.basic_salary)?;
        validate_non_negative("allowances.transport", new.allowances.transport)?;
        validate_non_negative("allowances.meal", new.allowances.meal)?;
        validate_non_negative("allowances.other", new.allowances.other)?;

        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            basic_salary: new.basic_salary,
            allowances: new.allowances,
            annual_leave_quota: new
                .annual_leave_quota
                .unwrap_or_else(|| config.default_annual_quota()),
            used_leave_quota: 0,
            status: EmployeeStatus::Active,
            latest_payroll_id: None,
        };
        self.commit(StagedWrites {
            employees: vec![employee.clone()],
            ..StagedWrites::default()
        })?;
        Ok(employee)
    }

    /// Looks up an employee by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no employee has the given id.
    pub fn employee(&self, id: &str) -> EngineResult<&Employee> {
        self.employees.get(id).ok_or_else(|| EngineError::NotFound {
            entity: "Employee".to_string(),
            id: id.to_string(),
        })
    }

    /// Returns all employees sorted by id.
    pub fn employees(&self) -> Vec<&Employee> {
        let mut all: Vec<&Employee> = self.employees.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Sets an employee's annual leave quota.
    ///
    /// Shrinking the quota below what has already been used is allowed;
    /// the returned mutation then carries a negative-remaining warning.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no employee has the given id.
    pub fn set_annual_quota(
        &mut self,
        employee_id: &str,
        new_quota: u32,
    ) -> EngineResult<QuotaChange> {
        let mut employee = self.employee(employee_id)?.clone();
        let mutation = leave::set_annual_quota(new_quota, employee.used_leave_quota, 1);
        employee.annual_leave_quota = mutation.annual_quota;

        self.commit(StagedWrites {
            employees: vec![employee.clone()],
            ..StagedWrites::default()
        })?;
        Ok(QuotaChange { employee, mutation })
    }

    // ---- leave ----

    /// Opens a new leave request for an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown employee and `Validation` for
    /// the intake failures described on
    /// [`open_request`](crate::leave::open_request).
    pub fn submit_leave_request(
        &mut self,
        employee_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
        config: &ConfigLoader,
    ) -> EngineResult<RequestOpening> {
        let employee = self.employee(employee_id)?;
        let opening = leave::open_request(
            employee,
            leave_type,
            start_date,
            end_date,
            reason,
            config.approver_titles(),
            1,
        )?;

        self.commit(StagedWrites {
            leave_requests: vec![opening.request.clone()],
            ..StagedWrites::default()
        })?;
        Ok(opening)
    }

    /// Looks up a leave request by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no request has the given id.
    pub fn leave_request(&self, id: &str) -> EngineResult<&LeaveRequest> {
        self.leave_requests
            .get(id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "Leave request".to_string(),
                id: id.to_string(),
            })
    }

    /// Records the stage-one decision on a leave request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown request and
    /// `InvalidStateTransition` when the request refuses the decision.
    pub fn decide_stage_one(
        &mut self,
        request_id: &str,
        decision: Decision,
    ) -> EngineResult<DecisionRecord> {
        let request = self.leave_request(request_id)?;
        let outcome = leave::decide_stage_one(request, decision, 1)?;

        self.commit(StagedWrites {
            leave_requests: vec![outcome.request.clone()],
            ..StagedWrites::default()
        })?;
        Ok(DecisionRecord {
            request: outcome.request,
            quota: None,
            steps: vec![outcome.audit_step],
        })
    }

    /// Records the stage-two decision on a leave request.
    ///
    /// Approval of a quota-drawing request debits the employee's quota
    /// in the same operation, so the request transition and the ledger
    /// debit land in one flush. Because a terminal request refuses
    /// further decisions, the debit can happen at most once per
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown request or employee and
    /// `InvalidStateTransition` when the request refuses the decision.
    pub fn decide_stage_two(
        &mut self,
        request_id: &str,
        decision: Decision,
    ) -> EngineResult<DecisionRecord> {
        let request = self.leave_request(request_id)?;
        let outcome = leave::decide_stage_two(request, decision, 1)?;
        let DecisionOutcome {
            request: updated,
            quota_debit_days,
            audit_step,
        } = outcome;

        let mut steps = vec![audit_step];
        let mut quota = None;
        let mut writes = StagedWrites {
            leave_requests: vec![updated.clone()],
            ..StagedWrites::default()
        };
        if let Some(days) = quota_debit_days {
            let mut employee = self.employee(&updated.employee_id)?.clone();
            let mutation = leave::debit_quota(
                employee.annual_leave_quota,
                employee.used_leave_quota,
                days,
                2,
            );
            employee.used_leave_quota = mutation.used_quota;
            writes.employees.push(employee);
            steps.push(mutation.audit_step.clone());
            quota = Some(mutation);
        }

        self.commit(writes)?;
        Ok(DecisionRecord {
            request: updated,
            quota,
            steps,
        })
    }

    // ---- attendance ----

    fn find_attendance(&self, employee_id: &str, date: NaiveDate) -> Option<&DailyAttendance> {
        self.attendance
            .values()
            .find(|record| record.employee_id == employee_id && record.date == date)
    }

    /// Records a check-in punch, creating the day's attendance record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown employee, `Validation` for an
    /// inactive one, and `InvalidStateTransition` when the day already
    /// has a check-in.
    pub fn check_in(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> EngineResult<DailyAttendance> {
        let employee = self.employee(employee_id)?;
        if !employee.is_active() {
            return Err(EngineError::Validation {
                field: "employee_id".to_string(),
                message: format!("employee '{}' is not active", employee_id),
            });
        }
        let employee_name = employee.name.clone();

        if let Some(existing) = self.find_attendance(employee_id, date) {
            let message = match existing.status {
                AttendanceStatus::CheckedOut => {
                    format!("attendance for {} is already resolved", date)
                }
                _ => format!("already checked in for {}", date),
            };
            return Err(EngineError::InvalidStateTransition {
                id: existing.id.clone(),
                message,
            });
        }

        let mut record =
            DailyAttendance::new(Uuid::new_v4().to_string(), employee_id, employee_name, date);
        record.check_in = Some(time);
        record.status = AttendanceStatus::CheckedIn;

        self.commit(StagedWrites {
            attendance: vec![record.clone()],
            ..StagedWrites::default()
        })?;
        Ok(record)
    }

    /// Records a check-out punch and resolves the day's hours.
    ///
    /// A check-out time earlier than the check-in time is read as a
    /// shift ending on the following day.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown employee and
    /// `InvalidStateTransition` when the day has no open check-in.
    pub fn check_out(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        config: &ConfigLoader,
    ) -> EngineResult<AttendanceResolution> {
        self.employee(employee_id)?;

        let Some(existing) = self.find_attendance(employee_id, date) else {
            return Err(EngineError::InvalidStateTransition {
                id: employee_id.to_string(),
                message: format!("no check-in recorded for {}", date),
            });
        };
        let mut attendance = existing.clone();

        match attendance.status {
            AttendanceStatus::CheckedOut => {
                return Err(EngineError::InvalidStateTransition {
                    id: attendance.id,
                    message: format!("attendance for {} is already resolved", date),
                });
            }
            AttendanceStatus::NotCheckedIn => {
                return Err(EngineError::InvalidStateTransition {
                    id: attendance.id,
                    message: format!("no check-in recorded for {}", date),
                });
            }
            AttendanceStatus::CheckedIn => {}
        }
        let Some(check_in) = attendance.check_in else {
            return Err(EngineError::InvalidStateTransition {
                id: attendance.id,
                message: "check-in time missing on an open record".to_string(),
            });
        };

        let resolution = resolve_work_interval(check_in, time, config.attendance_rules(), 1);

        attendance.check_out = Some(time);
        attendance.work_hours = Some(resolution.work_hours);
        attendance.regular_hours = Some(resolution.regular_hours);
        attendance.overtime_hours = Some(resolution.overtime_hours);
        attendance.status = AttendanceStatus::CheckedOut;

        self.commit(StagedWrites {
            attendance: vec![attendance.clone()],
            ..StagedWrites::default()
        })?;
        Ok(AttendanceResolution {
            attendance,
            resolution,
        })
    }

    // ---- payroll ----

    /// Sums the overtime hours of an employee's resolved attendance in
    /// a period.
    pub fn total_overtime_hours(&self, employee_id: &str, period: PayPeriod) -> Decimal {
        self.attendance
            .values()
            .filter(|record| {
                record.employee_id == employee_id
                    && record.is_resolved()
                    && period.contains_date(record.date)
            })
            .filter_map(|record| record.overtime_hours)
            .sum()
    }

    /// Runs payroll for a period over every active employee.
    ///
    /// Each employee's overtime hours are summed from the period's
    /// resolved attendance, the payroll engine computes the figures
    /// with zero other deductions, and the employee's
    /// `latest_payroll_id` is pointed at the resulting record.
    /// Re-running a period recomputes the period's records in place.
    ///
    /// Returns the records in employee-id order.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when an employee's stored figures
    /// fail payroll validation.
    pub fn run_payroll(
        &mut self,
        period: PayPeriod,
        config: &ConfigLoader,
    ) -> EngineResult<Vec<PayrollRecord>> {
        let roster: Vec<Employee> = self
            .employees()
            .into_iter()
            .filter(|employee| employee.is_active())
            .cloned()
            .collect();

        let mut writes = StagedWrites::default();
        let mut records = Vec::with_capacity(roster.len());
        for mut employee in roster {
            let inputs = PayrollInputs {
                basic_salary: employee.basic_salary,
                allowances: employee.allowances,
                overtime_hours: self.total_overtime_hours(&employee.id, period),
                other_deductions: Decimal::ZERO,
            };

            let calculation = calculate_payroll(&inputs, config)?;

            // A re-run keeps the period record's id stable so existing
            // references stay valid.
            let record_id = self
                .payroll_records
                .values()
                .find(|record| record.employee_id == employee.id && record.period == period)
                .map(|record| record.id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            let record = PayrollRecord {
                id: record_id.clone(),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                period,
                inputs,
                computation: calculation.computation,
                created_at: Utc::now(),
            };
            employee.latest_payroll_id = Some(record_id);
            writes.employees.push(employee);
            writes.payroll_records.push(record.clone());
            records.push(record);
        }

        self.commit(writes)?;
        Ok(records)
    }

    /// Looks up a payroll record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no record has the given id.
    pub fn payroll_record(&self, id: &str) -> EngineResult<&PayrollRecord> {
        self.payroll_records
            .get(id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "Payroll record".to_string(),
                id: id.to_string(),
            })
    }

    /// Replaces a payroll record's inputs and recomputes every derived
    /// figure through the payroll engine.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown record and `Validation` when
    /// the new inputs are rejected.
    pub fn update_payroll_record(
        &mut self,
        record_id: &str,
        inputs: PayrollInputs,
        config: &ConfigLoader,
    ) -> EngineResult<RecordRecalculation> {
        let mut record = self.payroll_record(record_id)?.clone();
        let calculation = calculate_payroll(&inputs, config)?;
        record.inputs = inputs;
        record.computation = calculation.computation;

        self.commit(StagedWrites {
            payroll_records: vec![record.clone()],
            ..StagedWrites::default()
        })?;
        Ok(RecordRecalculation {
            record,
            audit: calculation.audit,
        })
    }
}

fn validate_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::Validation {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

fn restore_entries<T>(map: &mut HashMap<String, T>, prior: Vec<(String, Option<T>)>) {
    for (id, entry) in prior {
        match entry {
            Some(value) => map.insert(id, value),
            None => map.remove(&id),
        };
    }
}
