//! Page side of the resource-open bridge.

use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::bridge::events::{BridgeEvent, EventBus, HelperReady, OpenFailure, OpenRequest};

/// Emits open requests and observes the helper's signals.
pub struct PageBridge {
    bus: EventBus,
}

impl PageBridge {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Ask the helper to open a local path. Fire-and-forget: there is no
    /// synchronous result, only the eventual failure event.
    ///
    /// An empty path is a caller bug; it is logged and the request is
    /// not emitted, since no caller awaits a result to escalate to.
    pub fn request_open(&self, path: &str) {
        if path.trim().is_empty() {
            tracing::error!("Ignoring folder-open request with an empty path");
            return;
        }
        self.bus.publish(BridgeEvent::OpenFolder(OpenRequest {
            path: path.to_string(),
        }));
    }

    /// Stream of delivery failures, for manual-recovery handling
    /// (typically: show the raw path so the user can copy it).
    pub fn failures(&self) -> impl Stream<Item = OpenFailure> + Send + use<> {
        BroadcastStream::new(self.bus.subscribe()).filter_map(|event| match event {
            Ok(BridgeEvent::OpenFailed(failure)) => Some(failure),
            _ => None,
        })
    }

    /// Wait for the helper's one-shot ready announcement. Returns `None`
    /// if the bus closes first.
    pub async fn helper_ready(&self) -> Option<HelperReady> {
        let mut rx = self.bus.subscribe();
        loop {
            match rx.recv().await {
                Ok(BridgeEvent::HelperReady(ready)) => return Some(ready),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Bridge listener lagged, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
