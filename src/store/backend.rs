//! Snapshot persistence backends.
//!
//! The store keeps its working set in memory and writes the whole state
//! out as one JSON snapshot after every mutation. A missing snapshot is
//! not an error; it means the store starts empty.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DailyAttendance, Employee, LeaveRequest, PayrollRecord};

/// The full persisted state of the store.
///
/// Collections are stored as vectors sorted by id so consecutive
/// snapshots of the same state are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HrSnapshot {
    /// All registered employees.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// All leave requests, in any lifecycle state.
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    /// All daily attendance records.
    #[serde(default)]
    pub attendance: Vec<DailyAttendance>,
    /// All generated payroll records.
    #[serde(default)]
    pub payroll_records: Vec<PayrollRecord>,
}

/// Where snapshots are loaded from and saved to.
///
/// Implementations must be safe to share behind the store's lock.
pub trait SnapshotBackend: Send + Sync {
    /// Loads the most recent snapshot, or `None` when nothing has been
    /// saved yet.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` when a snapshot exists but cannot be
    /// read or parsed.
    fn load(&self) -> EngineResult<Option<HrSnapshot>>;

    /// Persists the given snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` when the snapshot cannot be written.
    fn save(&mut self, snapshot: &HrSnapshot) -> EngineResult<()>;
}

/// Persists snapshots as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend that reads and writes the given file path.
    ///
    /// The parent directory is created on first save if it does not
    /// already exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotBackend for JsonFileBackend {
    fn load(&self) -> EngineResult<Option<HrSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| EngineError::StorageError {
                message: format!("failed to read {}: {}", self.path.display(), e),
            })?;
        let snapshot = serde_json::from_str(&content).map_err(|e| EngineError::StorageError {
            message: format!("failed to parse {}: {}", self.path.display(), e),
        })?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &HrSnapshot) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::StorageError {
                    message: format!("failed to create {}: {}", parent.display(), e),
                })?;
            }
        }
        let content =
            serde_json::to_string_pretty(snapshot).map_err(|e| EngineError::StorageError {
                message: format!("failed to serialize snapshot: {}", e),
            })?;
        std::fs::write(&self.path, content).map_err(|e| EngineError::StorageError {
            message: format!("failed to write {}: {}", self.path.display(), e),
        })
    }
}

/// Keeps the latest snapshot in memory. Used in tests and anywhere
/// durability is not wanted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    snapshot: Option<HrSnapshot>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with a snapshot, as if it had been
    /// saved by a previous session.
    pub fn with_snapshot(snapshot: HrSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> EngineResult<Option<HrSnapshot>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &HrSnapshot) -> EngineResult<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}
