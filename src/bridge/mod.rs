//! Resource-open bridge — lets the page open a local filesystem path in
//! the native file browser, a capability the sandbox denies to scripts.
//!
//! The page side emits an open-request event; the helper side normalizes
//! the path and walks an ordered fallback chain of delivery strategies,
//! escalating to a failure event only when every strategy is exhausted.

pub mod detect;
pub mod events;
pub mod helper;
pub mod host;
pub mod page;
pub mod path;

pub use detect::DetectionGate;
pub use events::{BridgeEvent, EventBus, HelperReady, OpenFailure, OpenRequest};
pub use helper::HelperBridge;
pub use host::{FrameHandle, HostPage, WindowHandle};
pub use page::PageBridge;
pub use path::to_file_url;
