//! User feedback sinks (the toast layer of the storefront).

mod buffer;
#[cfg(feature = "emitter")]
mod emitter;
mod sink;

pub use buffer::{BufferNotifier, Notification, NotificationLevel};
#[cfg(feature = "emitter")]
pub use emitter::{EmitterNotifier, FAILURE_EVENT, SUCCESS_EVENT};
pub use sink::{NotificationSink, TracingNotifier};
