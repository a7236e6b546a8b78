//! User-facing outcome notifications.
//!
//! Lifecycle commands mirror their terminal outcome to the user. The
//! concrete surface varies by embedding (toast widget, desktop shell,
//! plain log), so stores take the trait and never depend on a surface.

/// Sink for user-visible outcome messages.
///
/// Implementations must never fail loudly — a notification that cannot be
/// delivered is dropped, not escalated.
pub trait Notifier: Send + Sync {
    /// A command completed successfully.
    fn success(&self, message: &str);

    /// A command failed; `message` already carries the server detail
    /// when one was reported.
    fn error(&self, message: &str);
}

/// Fallback notifier that writes to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
