//! Bridge event protocol — typed payloads over a broadcast bus.
//!
//! The wire format mirrors the page-scoped custom events the helper
//! interoperates with: an event name plus a JSON detail object. Names and
//! payload fields must stay bit-exact.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Page → helper: open this local path.
pub const OPEN_FOLDER_EVENT: &str = "kikoeru-open-folder";
/// Helper → page: the helper detected the page and is ready.
pub const HELPER_READY_EVENT: &str = "kikoeru-helper-ready";
/// Helper → page: every delivery strategy was exhausted.
pub const OPEN_FAILED_EVENT: &str = "kikoeru-open-failed";
/// The only failure reason currently emitted.
pub const REASON_ALL_METHODS_FAILED: &str = "all_methods_failed";

/// Payload of `kikoeru-open-folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub path: String,
}

/// Payload of `kikoeru-helper-ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperReady {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

/// Payload of `kikoeru-open-failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFailure {
    pub path: String,
    pub reason: String,
}

/// One event on the bridge bus.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    OpenFolder(OpenRequest),
    HelperReady(HelperReady),
    OpenFailed(OpenFailure),
}

impl BridgeEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenFolder(_) => OPEN_FOLDER_EVENT,
            Self::HelperReady(_) => HELPER_READY_EVENT,
            Self::OpenFailed(_) => OPEN_FAILED_EVENT,
        }
    }

    /// Wire detail object.
    pub fn detail(&self) -> serde_json::Value {
        let result = match self {
            Self::OpenFolder(payload) => serde_json::to_value(payload),
            Self::HelperReady(payload) => serde_json::to_value(payload),
            Self::OpenFailed(payload) => serde_json::to_value(payload),
        };
        result.unwrap_or(serde_json::Value::Null)
    }

    /// Parse an event from its wire name and detail. Unknown names and
    /// malformed payloads yield `None`.
    pub fn from_wire(name: &str, detail: serde_json::Value) -> Option<Self> {
        match name {
            OPEN_FOLDER_EVENT => serde_json::from_value(detail).ok().map(Self::OpenFolder),
            HELPER_READY_EVENT => serde_json::from_value(detail).ok().map(Self::HelperReady),
            OPEN_FAILED_EVENT => serde_json::from_value(detail).ok().map(Self::OpenFailed),
            _ => None,
        }
    }
}

/// Untargeted broadcast bus for bridge events.
///
/// Any number of listeners may subscribe; publishing with no listeners is
/// not an error. There is no acknowledgment or request/response
/// correlation — only emission order.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn publish(&self, event: BridgeEvent) {
        // A send error only means nobody is subscribed right now.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_bit_exact() {
        let open = BridgeEvent::OpenFolder(OpenRequest { path: "/a".into() });
        let ready = BridgeEvent::HelperReady(HelperReady {
            version: "1.0".into(),
            features: None,
        });
        let failed = BridgeEvent::OpenFailed(OpenFailure {
            path: "file:///a".into(),
            reason: REASON_ALL_METHODS_FAILED.into(),
        });

        assert_eq!(open.name(), "kikoeru-open-folder");
        assert_eq!(ready.name(), "kikoeru-helper-ready");
        assert_eq!(failed.name(), "kikoeru-open-failed");
        assert_eq!(REASON_ALL_METHODS_FAILED, "all_methods_failed");
    }

    #[test]
    fn open_request_detail_shape() {
        let event = BridgeEvent::OpenFolder(OpenRequest {
            path: "D:\\media\\RJ123456".into(),
        });
        assert_eq!(
            event.detail(),
            serde_json::json!({ "path": "D:\\media\\RJ123456" })
        );
    }

    #[test]
    fn ready_detail_omits_absent_features() {
        let bare = BridgeEvent::HelperReady(HelperReady {
            version: "1.0".into(),
            features: None,
        });
        assert_eq!(bare.detail(), serde_json::json!({ "version": "1.0" }));

        let full = BridgeEvent::HelperReady(HelperReady {
            version: "1.0".into(),
            features: Some(vec!["open-folder".into()]),
        });
        assert_eq!(
            full.detail(),
            serde_json::json!({ "version": "1.0", "features": ["open-folder"] })
        );
    }

    #[test]
    fn failure_detail_shape() {
        let event = BridgeEvent::OpenFailed(OpenFailure {
            path: "file:///C:/media".into(),
            reason: REASON_ALL_METHODS_FAILED.into(),
        });
        assert_eq!(
            event.detail(),
            serde_json::json!({
                "path": "file:///C:/media",
                "reason": "all_methods_failed",
            })
        );
    }

    #[test]
    fn from_wire_round_trips_every_event() {
        let events = [
            BridgeEvent::OpenFolder(OpenRequest { path: "/x".into() }),
            BridgeEvent::HelperReady(HelperReady {
                version: "2.1".into(),
                features: Some(vec!["open-folder".into()]),
            }),
            BridgeEvent::OpenFailed(OpenFailure {
                path: "file:///x".into(),
                reason: REASON_ALL_METHODS_FAILED.into(),
            }),
        ];
        for event in events {
            let parsed = BridgeEvent::from_wire(event.name(), event.detail());
            assert_eq!(parsed, Some(event));
        }
    }

    #[test]
    fn from_wire_rejects_unknown_names() {
        assert_eq!(
            BridgeEvent::from_wire("kikoeru-unknown", serde_json::json!({})),
            None
        );
    }

    #[tokio::test]
    async fn bus_broadcasts_to_every_subscriber() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BridgeEvent::OpenFolder(OpenRequest { path: "/a".into() }));

        let expected = BridgeEvent::OpenFolder(OpenRequest { path: "/a".into() });
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        bus.publish(BridgeEvent::OpenFolder(OpenRequest { path: "/a".into() }));
    }
}
