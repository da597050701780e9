//! Application state for the upload API

use std::sync::Arc;

use filedrop_core::DiskStore;

use crate::config::UploadConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where accepted files go
    store: Arc<DiskStore>,
    /// Endpoint configuration
    config: Arc<UploadConfig>,
}

impl AppState {
    /// Create state from config, using the configured directory and naming scheme
    pub fn new(config: UploadConfig) -> Self {
        let store = DiskStore::new(config.dir.clone(), config.naming.namer());
        Self::with_store(config, store)
    }

    /// Create state with an explicit store (custom namer, tests)
    pub fn with_store(config: UploadConfig, store: DiskStore) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &DiskStore {
        &self.store
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Multipart field that carries the file
    pub fn field_name(&self) -> &str {
        &self.config.field
    }
}
