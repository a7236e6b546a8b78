//! Configuration types.

use std::time::Duration;

/// Control-layer configuration.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Base URL of the job-management API (including the `/api` prefix).
    pub api_base: String,
    /// Delay between a lifecycle command resolving and the reconciliation
    /// re-fetch. The server applies commands asynchronously, so an
    /// immediate fetch would often read stale state.
    pub reconcile_delay: Duration,
    /// Bridge timing knobs.
    pub bridge: BridgeConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api".to_string(),
            reconcile_delay: Duration::from_millis(500),
            bridge: BridgeConfig::default(),
        }
    }
}

/// Timing configuration for the resource-open bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Page fingerprint poll interval for the detection gate.
    pub detect_interval: Duration,
    /// How long a browsing context opened by the fallback chain is left
    /// alive before the guarded auto-close.
    pub tab_close_delay: Duration,
    /// How long the hidden frame is left attached before removal.
    pub frame_cleanup_delay: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            detect_interval: Duration::from_secs(1),
            tab_close_delay: Duration::from_millis(1500),
            frame_cleanup_delay: Duration::from_secs(2),
        }
    }
}
