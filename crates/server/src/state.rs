//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::CustomerStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the store
/// backend selected at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn CustomerStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn CustomerStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a handle to the active customer store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn CustomerStore> {
        Arc::clone(&self.inner.store)
    }
}
