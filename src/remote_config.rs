//! Remote configuration — single fetch-and-cache of the server config.
//!
//! The control layer never interprets the document; it is cached as raw
//! JSON for whatever surface wants to display or edit it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::api::JobApi;
use crate::error::ApiError;

/// Cached, unparsed server configuration.
pub struct RemoteConfig {
    api: Arc<dyn JobApi>,
    config: RwLock<Option<serde_json::Value>>,
    loading: AtomicBool,
}

impl RemoteConfig {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self {
            api,
            config: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The cached document, if any fetch has succeeded yet.
    pub async fn get(&self) -> Option<serde_json::Value> {
        self.config.read().await.clone()
    }

    /// Fetch and cache the configuration. Failures are logged, leave the
    /// cache untouched, and are re-raised.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.api.fetch_config().await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(value) => {
                *self.config.write().await = Some(value);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to fetch config: {e}");
                Err(e)
            }
        }
    }
}
