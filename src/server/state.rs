//! Server state and configuration.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::PhotoBackend;
use crate::config::Config;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
}

/// Application state shared across handlers.
///
/// Nothing here is written after startup; handlers only read.
pub struct AppState {
    /// Base configuration; each request clones it before applying overrides
    pub base: Arc<Config>,
    pub backend: Arc<dyn PhotoBackend>,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(base: Config, backend: Arc<dyn PhotoBackend>) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            base: Arc::new(base),
            backend,
            boot_time,
        }
    }
}
