//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading policy
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AttendanceRules, ContributionsConfig, HrPolicy, LeaveConfig, PolicyMetadata, TaxBracket,
    TaxConfig, WorkConfig,
};

/// Loads and provides access to the policy configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query tax brackets, contribution rates,
/// working-time rules, and leave policy.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/hris/
/// ├── policy.yaml          # Policy bundle metadata
/// ├── tax.yaml             # Progressive tax schedule
/// ├── contributions.yaml   # Statutory contribution rates
/// ├── work.yaml            # Overtime and attendance rules
/// └── leave.yaml           # Leave quota and approval stages
/// ```
///
/// # Example
///
/// ```no_run
/// use hris_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/hris").unwrap();
///
/// // Query the overtime divisor
/// println!("Monthly divisor: {} hours", loader.monthly_divisor_hours());
///
/// // Query the approval stage titles
/// let (first, second) = loader.approver_titles();
/// println!("Stages: {} then {}", first, second);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: HrPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/hris")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The loaded values violate a schedule rule (non-ascending tax
    ///   brackets, rates outside `0..=1`, non-positive divisors)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hris_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/hris")?;
    /// # Ok::<(), hris_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load policy.yaml
        let policy_path = path.join("policy.yaml");
        let metadata = Self::load_yaml::<PolicyMetadata>(&policy_path)?;

        // Load tax.yaml
        let tax_path = path.join("tax.yaml");
        let tax = Self::load_yaml::<TaxConfig>(&tax_path)?;

        // Load contributions.yaml
        let contributions_path = path.join("contributions.yaml");
        let contributions = Self::load_yaml::<ContributionsConfig>(&contributions_path)?;

        // Load work.yaml
        let work_path = path.join("work.yaml");
        let work = Self::load_yaml::<WorkConfig>(&work_path)?;

        // Load leave.yaml
        let leave_path = path.join("leave.yaml");
        let leave = Self::load_yaml::<LeaveConfig>(&leave_path)?;

        let policy = HrPolicy::new(metadata, tax, contributions, work, leave)?;

        Ok(Self { policy })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying policy bundle.
    pub fn policy(&self) -> &HrPolicy {
        &self.policy
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.policy.metadata()
    }

    /// Returns the progressive tax brackets, lowest threshold first.
    pub fn tax_brackets(&self) -> &[TaxBracket] {
        &self.policy.tax().brackets
    }

    /// Returns the statutory article reference for the tax schedule.
    pub fn tax_clause(&self) -> &str {
        &self.policy.tax().clause
    }

    /// Returns the health insurance contribution rate.
    pub fn kesehatan_rate(&self) -> Decimal {
        self.policy.contributions().kesehatan_rate
    }

    /// Returns the employment insurance contribution rate.
    pub fn ketenagakerjaan_rate(&self) -> Decimal {
        self.policy.contributions().ketenagakerjaan_rate
    }

    /// Returns the statutory article reference for contributions.
    pub fn contributions_clause(&self) -> &str {
        &self.policy.contributions().clause
    }

    /// Returns the divisor converting monthly basic salary to hourly.
    pub fn monthly_divisor_hours(&self) -> Decimal {
        self.policy.work().monthly_divisor_hours
    }

    /// Returns the overtime pay multiplier.
    pub fn overtime_multiplier(&self) -> Decimal {
        self.policy.work().overtime_multiplier
    }

    /// Returns the statutory article reference for working time.
    pub fn work_clause(&self) -> &str {
        &self.policy.work().clause
    }

    /// Returns the attendance resolution rules.
    pub fn attendance_rules(&self) -> &AttendanceRules {
        &self.policy.work().attendance
    }

    /// Returns the annual leave quota for newly registered employees.
    pub fn default_annual_quota(&self) -> u32 {
        self.policy.leave().default_annual_quota
    }

    /// Returns the statutory article reference for leave.
    pub fn leave_clause(&self) -> &str {
        &self.policy.leave().clause
    }

    /// Returns the approver titles for the two stages, first stage first.
    pub fn approver_titles(&self) -> (&str, &str) {
        let stages = &self.policy.leave().stages;
        (&stages.stage_one_title, &stages.stage_two_title)
    }
}
