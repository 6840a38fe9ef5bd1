/// Fire-and-forget user feedback.
///
/// Implementations must not block; the controller calls them inline.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, message: &str);

    fn notify_failure(&self, message: &str);
}

/// A sink that writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(target: "storefront::notify", %message, "success");
    }

    fn notify_failure(&self, message: &str) {
        tracing::warn!(target: "storefront::notify", %message, "failure");
    }
}
