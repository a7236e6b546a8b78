//! Watcher control — on/off state for the filesystem watch subsystem.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::api::JobApi;
use crate::error::ApiError;

/// Status record reported by `GET /api/watcher/status`.
///
/// Replaced wholesale on every fetch; `pending_files` entries are opaque
/// to the control layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatcherStatus {
    pub is_running: bool,
    #[serde(default)]
    pub watch_path: String,
    #[serde(default)]
    pub pending_files: Vec<String>,
}

/// Issues start/stop commands and mirrors the watcher status.
///
/// The running flag is never set optimistically; it always reflects the
/// last successful status fetch.
pub struct WatcherControl {
    api: Arc<dyn JobApi>,
    status: Arc<RwLock<WatcherStatus>>,
}

impl WatcherControl {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self {
            api,
            status: Arc::new(RwLock::new(WatcherStatus::default())),
        }
    }

    /// Snapshot of the last fetched status.
    pub async fn status(&self) -> WatcherStatus {
        self.status.read().await.clone()
    }

    /// Refresh the status record. Best-effort telemetry: failures are
    /// logged and swallowed, leaving the prior record in place.
    pub async fn fetch_status(&self) {
        match self.api.watcher_status().await {
            Ok(status) => *self.status.write().await = status,
            Err(e) => tracing::error!("Failed to fetch watcher status: {e}"),
        }
    }

    /// Start the watcher and re-fetch its status.
    pub async fn start(&self) -> Result<(), ApiError> {
        let result = self.api.start_watcher().await;
        // Re-fetch unconditionally so the record tracks whatever state
        // the server actually ended up in.
        self.fetch_status().await;
        result.map_err(|e| {
            tracing::error!("Failed to start watcher: {e}");
            e
        })
    }

    /// Stop the watcher and re-fetch its status.
    pub async fn stop(&self) -> Result<(), ApiError> {
        let result = self.api.stop_watcher().await;
        self.fetch_status().await;
        result.map_err(|e| {
            tracing::error!("Failed to stop watcher: {e}");
            e
        })
    }
}
