use std::sync::Mutex;

use event_emitter_rs::EventEmitter;

use super::NotificationSink;

pub const SUCCESS_EVENT: &str = "notify.success";
pub const FAILURE_EVENT: &str = "notify.failure";

/// A sink that emits notifications to in-process listeners.
///
/// Listeners receive the message as a `String` on [`SUCCESS_EVENT`] or
/// [`FAILURE_EVENT`].
pub struct EmitterNotifier {
    emitter: Mutex<EventEmitter>,
}

impl Default for EmitterNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EmitterNotifier {
    pub fn new() -> Self {
        Self::with_emitter(EventEmitter::new())
    }

    pub fn with_emitter(emitter: EventEmitter) -> Self {
        Self {
            emitter: Mutex::new(emitter),
        }
    }

    /// Register a listener for one of the notification events.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(event, listener);
        }
    }

    fn emit(&self, event: &str, message: &str) {
        if let Ok(mut emitter) = self.emitter.lock() {
            // Listeners run on their own threads; nothing waits for them.
            let _ = emitter.emit(event, message.to_string());
        }
    }
}

impl NotificationSink for EmitterNotifier {
    fn notify_success(&self, message: &str) {
        self.emit(SUCCESS_EVENT, message);
    }

    fn notify_failure(&self, message: &str) {
        self.emit(FAILURE_EVENT, message);
    }
}
