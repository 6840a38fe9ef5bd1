use std::sync::{Arc, Mutex};

use super::NotificationSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// A sink that records notifications in a shared buffer.
///
/// Clone-friendly; clones append to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferNotifier {
    buffer: Arc<Mutex<Vec<Notification>>>,
}

impl BufferNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<Notification>>>) -> Self {
        Self { buffer }
    }

    /// Everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.buffer
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.buffer
            .lock()
            .map(|mut buffer| std::mem::take(&mut *buffer))
            .unwrap_or_default()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        // A poisoned buffer only loses feedback.
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(Notification {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl NotificationSink for BufferNotifier {
    fn notify_success(&self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn notify_failure(&self, message: &str) {
        self.push(NotificationLevel::Failure, message);
    }
}
