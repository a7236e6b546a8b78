//! Helper side of the resource-open bridge — the fallback chain.
//!
//! Strategies are attempted in a fixed order and differ in how much they
//! can observe: the privileged tab reports thrown failures only, the
//! window primitive reports a missing context, and the hidden frame can
//! observe nothing at all. The chain advances on anything but a
//! delivered outcome; only the frame's indeterminate end (or a failure
//! of every strategy) escalates to the failure event.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::bridge::events::{
    BridgeEvent, EventBus, OpenFailure, REASON_ALL_METHODS_FAILED,
};
use crate::bridge::host::{HostPage, WindowHandle};
use crate::bridge::path::to_file_url;
use crate::config::BridgeConfig;

/// Outcome of one delivery strategy.
#[derive(Debug)]
enum DeliveryOutcome {
    /// The strategy believes it delivered (no failure observed).
    Delivered,
    /// The strategy observably failed; fall through to the next.
    Failed(String),
    /// Success or failure cannot be observed.
    Indeterminate,
}

/// Drives the fallback chain for incoming open requests.
pub struct HelperBridge {
    host: Arc<dyn HostPage>,
    bus: EventBus,
    config: BridgeConfig,
}

impl HelperBridge {
    pub fn new(host: Arc<dyn HostPage>, bus: EventBus, config: BridgeConfig) -> Self {
        Self { host, bus, config }
    }

    /// Consume open-request events until the bus closes. Requests are
    /// handled one at a time; there is no concurrent delivery.
    pub async fn run(&self) {
        let mut rx = self.bus.subscribe();
        loop {
            match rx.recv().await {
                Ok(BridgeEvent::OpenFolder(request)) => self.open_path(&request.path).await,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Helper lagged behind the bus, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return,
            }
        }
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Normalize the path and walk the fallback chain.
    pub async fn open_path(&self, raw_path: &str) {
        let url = to_file_url(raw_path);
        tracing::info!("Opening local path: {url}");

        match self.try_privileged_tab(&url) {
            DeliveryOutcome::Delivered => {
                self.announce(&format!("Opened {url} in a new tab"));
                return;
            }
            outcome => log_fallthrough("privileged tab", &outcome),
        }

        match self.try_new_window(&url) {
            DeliveryOutcome::Delivered => {
                self.announce(&format!("Opened {url} in a new window"));
                return;
            }
            outcome => log_fallthrough("new window", &outcome),
        }

        // The frame strategy cannot observe its own outcome; once its
        // cleanup has run, the chain is exhausted either way.
        let outcome = self.try_hidden_frame(&url).await;
        log_fallthrough("hidden frame", &outcome);
        self.escalate_failure(&url, raw_path);
    }

    /// Strategy A: host-provided "open in tab". Success means only that
    /// nothing was thrown; the tab is never verified.
    fn try_privileged_tab(&self, url: &str) -> DeliveryOutcome {
        match self.host.open_in_tab(url, true) {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }

    /// Strategy B: standard new-window primitive. A returned context
    /// counts as delivery; the context is auto-closed shortly after so
    /// no blank tab is left behind.
    fn try_new_window(&self, url: &str) -> DeliveryOutcome {
        match self.host.open_window(url) {
            Ok(Some(window)) => {
                self.schedule_window_close(window);
                DeliveryOutcome::Delivered
            }
            Ok(None) => DeliveryOutcome::Failed("no context returned (popup blocked?)".into()),
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }

    /// Strategy C: hidden embedding element. Pure best-effort — the
    /// element is removed after a fixed delay regardless of outcome.
    async fn try_hidden_frame(&self, url: &str) -> DeliveryOutcome {
        match self.host.insert_hidden_frame(url) {
            Ok(frame) => {
                tokio::time::sleep(self.config.frame_cleanup_delay).await;
                frame.remove();
                DeliveryOutcome::Indeterminate
            }
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }

    fn schedule_window_close(&self, window: Box<dyn WindowHandle>) -> JoinHandle<()> {
        let delay = self.config.tab_close_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Guarded close: the handle tolerates the context being gone.
            window.close();
        })
    }

    /// Full-chain exhaustion: failure event plus a manual-recovery
    /// notification carrying the raw path for copying.
    fn escalate_failure(&self, url: &str, raw_path: &str) {
        self.bus.publish(BridgeEvent::OpenFailed(OpenFailure {
            path: url.to_string(),
            reason: REASON_ALL_METHODS_FAILED.to_string(),
        }));
        self.announce(&format!(
            "Could not open the folder automatically. Copy the path and open it manually: {raw_path}"
        ));
    }

    /// Best-effort user notification: host capability first, log line
    /// otherwise. Never escalates.
    fn announce(&self, message: &str) {
        if !self.host.notify(message) {
            tracing::info!("{message}");
        }
    }
}

fn log_fallthrough(strategy: &str, outcome: &DeliveryOutcome) {
    match outcome {
        DeliveryOutcome::Failed(reason) => {
            tracing::warn!("Strategy '{strategy}' failed: {reason}");
        }
        DeliveryOutcome::Indeterminate => {
            tracing::debug!("Strategy '{strategy}' finished with unknown outcome");
        }
        DeliveryOutcome::Delivered => {}
    }
}
