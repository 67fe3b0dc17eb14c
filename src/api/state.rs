//! Application state for the HRIS engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::store::HrStore;

/// Shared application state.
///
/// Contains the loaded policy configuration and the record store. The
/// store sits behind a `RwLock`; handlers that mutate it take the write
/// lock for the whole operation, which serialises conflicting edits and
/// keeps multi-record updates (a stage-two approval and its quota
/// debit) atomic.
#[derive(Clone)]
pub struct AppState {
    /// The loaded HR policy configuration.
    config: Arc<ConfigLoader>,
    /// The shared record store.
    store: Arc<RwLock<HrStore>>,
}

impl AppState {
    /// Creates a new application state with the given configuration
    /// loader and store.
    pub fn new(config: ConfigLoader, store: HrStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the lock guarding the record store.
    pub fn store(&self) -> &RwLock<HrStore> {
        &self.store
    }
}
