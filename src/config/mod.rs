//! Configuration loading and management for the payroll and leave engine.
//!
//! This module provides functionality to load policy configurations from YAML
//! files, including the tax schedule, contribution rates, working-time rules,
//! and leave policy.
//!
//! # Example
//!
//! ```no_run
//! use hris_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/hris").unwrap();
//! println!("Loaded policy: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApprovalStages, AttendanceRules, ContributionsConfig, HrPolicy, LeaveConfig, PolicyMetadata,
    TaxBracket, TaxConfig, WorkConfig,
};
