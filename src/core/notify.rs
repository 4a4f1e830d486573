//! User-facing notification of business-level feed failures.

use std::sync::{Mutex, PoisonError};
use tracing::warn;

pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Emits each message as a warning event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        warn!(%message, "Feed reported a failure");
    }
}

/// Buffers messages until the caller drains them for display.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    pub fn drain(&self) -> Vec<String> {
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *messages)
    }
}

impl Notifier for CollectingNotifier {
    fn notify_error(&self, message: &str) {
        LogNotifier.notify_error(message);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
