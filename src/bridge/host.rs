//! Host page capabilities — everything the helper can do outside the
//! sandbox, behind a trait so tests can substitute a recording fake.

use crate::error::BridgeError;

/// A browsing context opened by the helper.
pub trait WindowHandle: Send + Sync {
    /// Close the context. Must tolerate the context already being gone
    /// (the user may have closed it, or navigation discarded it).
    fn close(&self);
}

/// A hidden embedding element attached to the document.
pub trait FrameHandle: Send + Sync {
    /// Detach the element. Must tolerate it already being detached.
    fn remove(&self);
}

/// Capabilities granted by the hosting environment.
///
/// Every method is a thin wrapper over a host primitive; none of them
/// verify that the target actually loaded.
pub trait HostPage: Send + Sync {
    /// Privileged "open in tab" capability. Hosts without the capability
    /// return `BridgeError::CapabilityUnavailable`, which the fallback
    /// chain treats exactly like a thrown failure.
    fn open_in_tab(&self, url: &str, active: bool) -> Result<(), BridgeError>;

    /// Standard new-window/tab primitive. `Ok(None)` means the host
    /// refused to produce a context (popup blocked).
    fn open_window(&self, url: &str) -> Result<Option<Box<dyn WindowHandle>>, BridgeError>;

    /// Create an off-screen, zero-size embedding element pointed at
    /// `url` and attach it to the document.
    fn insert_hidden_frame(&self, url: &str) -> Result<Box<dyn FrameHandle>, BridgeError>;

    /// Host-provided notification surface. Returns `false` when no such
    /// capability exists; the caller falls back to a log line.
    fn notify(&self, message: &str) -> bool;

    /// Whether an element matching `selector` is present on the page.
    fn has_element(&self, selector: &str) -> bool;

    /// Current document title.
    fn title(&self) -> String;
}
