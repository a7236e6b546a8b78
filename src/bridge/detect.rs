//! Page-detection gate — one-shot recognition of the hosting page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::bridge::events::{BridgeEvent, EventBus, HelperReady};
use crate::bridge::host::HostPage;

/// Structural marker element the app shell always renders.
pub const PAGE_MARKER_SELECTOR: &str = ".app-container";
/// Title substring fingerprint; either fingerprint alone suffices.
pub const TITLE_FINGERPRINT: &str = "Kikoeru";
/// Capability advertised in the ready event.
pub const FEATURE_OPEN_FOLDER: &str = "open-folder";

/// Polls the page for fingerprints and announces readiness exactly once.
///
/// The detected flag is write-once per gate instance; the gate never
/// resets, and further polls after a match are no-ops.
pub struct DetectionGate {
    host: Arc<dyn HostPage>,
    bus: EventBus,
    interval: Duration,
    detected: AtomicBool,
}

impl DetectionGate {
    pub fn new(host: Arc<dyn HostPage>, bus: EventBus, interval: Duration) -> Self {
        Self {
            host,
            bus,
            interval,
            detected: AtomicBool::new(false),
        }
    }

    /// Whether the page has been recognized.
    pub fn is_detected(&self) -> bool {
        self.detected.load(Ordering::SeqCst)
    }

    fn fingerprint_matches(&self) -> bool {
        self.host.has_element(PAGE_MARKER_SELECTOR)
            || self.host.title().contains(TITLE_FINGERPRINT)
    }

    /// Inspect the page once. Returns `true` only on the poll that
    /// transitions the gate from undetected to detected.
    pub fn poll_once(&self) -> bool {
        if self.detected.load(Ordering::SeqCst) || !self.fingerprint_matches() {
            return false;
        }
        if self.detected.swap(true, Ordering::SeqCst) {
            return false;
        }

        tracing::info!("Kikoeru page detected, announcing helper readiness");
        self.bus.publish(BridgeEvent::HelperReady(HelperReady {
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: Some(vec![FEATURE_OPEN_FOLDER.to_string()]),
        }));
        true
    }

    /// Poll on the configured interval until the page is recognized,
    /// then stop.
    pub async fn run(&self) {
        loop {
            if self.poll_once() || self.is_detected() {
                return;
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::bridge::host::{FrameHandle, WindowHandle};
    use crate::error::BridgeError;

    struct FakePage {
        marker: AtomicBool,
        title: Mutex<String>,
    }

    impl FakePage {
        fn new(marker: bool, title: &str) -> Self {
            Self {
                marker: AtomicBool::new(marker),
                title: Mutex::new(title.to_string()),
            }
        }
    }

    impl HostPage for FakePage {
        fn open_in_tab(&self, _url: &str, _active: bool) -> Result<(), BridgeError> {
            Err(BridgeError::CapabilityUnavailable {
                capability: "open_in_tab".into(),
            })
        }

        fn open_window(&self, _url: &str) -> Result<Option<Box<dyn WindowHandle>>, BridgeError> {
            Ok(None)
        }

        fn insert_hidden_frame(&self, _url: &str) -> Result<Box<dyn FrameHandle>, BridgeError> {
            Err(BridgeError::StrategyFailed {
                strategy: "hidden_frame".into(),
                reason: "no document".into(),
            })
        }

        fn notify(&self, _message: &str) -> bool {
            false
        }

        fn has_element(&self, selector: &str) -> bool {
            selector == PAGE_MARKER_SELECTOR && self.marker.load(Ordering::SeqCst)
        }

        fn title(&self) -> String {
            self.title.lock().unwrap().clone()
        }
    }

    fn ready_count(rx: &mut tokio::sync::broadcast::Receiver<BridgeEvent>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, BridgeEvent::HelperReady(_)) {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn ready_fires_exactly_once_across_repeated_polls() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        // Both fingerprints match at once.
        let gate = DetectionGate::new(
            Arc::new(FakePage::new(true, "Kikoeru Tool")),
            bus,
            Duration::from_secs(1),
        );

        assert!(gate.poll_once());
        for _ in 0..5 {
            assert!(!gate.poll_once());
        }
        assert!(gate.is_detected());
        assert_eq!(ready_count(&mut rx), 1);
    }

    #[tokio::test]
    async fn title_fingerprint_alone_suffices() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let gate = DetectionGate::new(
            Arc::new(FakePage::new(false, "Kikoeru — library")),
            bus,
            Duration::from_secs(1),
        );

        assert!(gate.poll_once());
        match rx.try_recv().unwrap() {
            BridgeEvent::HelperReady(ready) => {
                assert_eq!(ready.version, env!("CARGO_PKG_VERSION"));
                assert_eq!(
                    ready.features.as_deref(),
                    Some(&["open-folder".to_string()][..])
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_fingerprint_means_no_ready_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let gate = DetectionGate::new(
            Arc::new(FakePage::new(false, "Some Other App")),
            bus,
            Duration::from_secs(1),
        );

        assert!(!gate.poll_once());
        assert!(!gate.is_detected());
        assert_eq!(ready_count(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_polls_until_match_then_stops() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let page = Arc::new(FakePage::new(false, "loading..."));
        let gate = Arc::new(DetectionGate::new(
            page.clone(),
            bus,
            Duration::from_secs(1),
        ));

        let handle = gate.clone().spawn();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(!gate.is_detected());

        // The page finishes rendering; the next poll must match.
        page.marker.store(true, Ordering::SeqCst);
        handle.await.unwrap();

        assert!(gate.is_detected());
        assert_eq!(ready_count(&mut rx), 1);
    }
}
