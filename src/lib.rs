//! HRIS engine for HR administration
//!
//! This crate provides payroll calculation under simplified Indonesian
//! statutory rules, daily attendance resolution, two-stage leave
//! approval with a quota ledger, and KPI assessment, exposed over an
//! HTTP API backed by a snapshot store.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod leave;
pub mod models;
pub mod store;
