//! Application state management

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::store::StateStore;

/// Shared application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Unit state, history and command log files
    pub store: StateStore,
    /// Serializes read-modify-write cycles on the state file
    pub command_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let store = StateStore::new(config.data.dir.clone());
        Arc::new(Self {
            config,
            store,
            command_lock: Mutex::new(()),
        })
    }
}
