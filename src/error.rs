//! Error types for the HRIS engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation and
//! leave administration.

use thiserror::Error;

/// The main error type for the HRIS engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hris_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value was malformed or outside its allowed domain.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field or input that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// An operation was attempted that the record's current state forbids.
    #[error("Invalid state transition for '{id}': {message}")]
    InvalidStateTransition {
        /// The ID of the record the transition was attempted on.
        id: String,
        /// A description of why the transition is illegal.
        message: String,
    },

    /// A referenced record does not exist in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g., "Employee", "Leave request").
        entity: String,
        /// The ID that was looked up.
        id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The snapshot store could not be read or written.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
