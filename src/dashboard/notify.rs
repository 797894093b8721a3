use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "message-success",
            NotificationKind::Error => "message-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug)]
struct Shown {
    generation: u64,
    notification: Notification,
}

/// The single transient message region.
///
/// Each `show` cancels the previous hide timer before starting its own, so a
/// message always stays up for the full timeout. Must be used from within a
/// Tokio runtime.
#[derive(Debug)]
pub struct Notifier {
    current: Arc<Mutex<Option<Shown>>>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    timeout: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_timeout(NOTIFICATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            timer: None,
            generation: 0,
            timeout,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        let notification = Notification {
            kind,
            message: message.into(),
        };
        tracing::debug!(?kind, message = %notification.message, "showing notification");

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(Shown {
            generation,
            notification,
        });

        let current = Arc::clone(&self.current);
        let timeout = self.timeout;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut slot = current.lock().unwrap_or_else(PoisonError::into_inner);
            // A newer message may have replaced ours between wake-up and lock.
            if slot.as_ref().is_some_and(|s| s.generation == generation) {
                *slot = None;
            }
        }));
    }

    pub fn current(&self) -> Option<Notification> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.notification.clone())
    }

    pub fn dismiss(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
