//! Transient user-facing messages (snackbars).

use crate::observable::{Observable, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use suko_commerce::MessageId;
use tokio::task::JoinHandle;

/// How long a message stays up when no duration is given.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// One message on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnackbarMessage {
    pub id: MessageId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Display time; `None` (or zero) keeps the message until dismissed.
    #[serde(rename = "durationMs", default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Ordered list of live messages with auto-expiry.
///
/// Cloning is cheap; clones share the same messages and timers.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

#[derive(Debug)]
struct BusInner {
    messages: Observable<Vec<SnackbarMessage>>,
    timers: Mutex<HashMap<MessageId, JoinHandle<()>>>,
    default_duration: Duration,
}

impl BusInner {
    fn remove_message(&self, id: &MessageId) -> bool {
        self.messages.modify_if(|messages| {
            let before = messages.len();
            messages.retain(|m| &m.id != id);
            messages.len() != before
        })
    }

    fn take_timer(&self, id: &MessageId) -> Option<JoinHandle<()>> {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    fn abort_all(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }
}

impl Drop for BusInner {
    fn drop(&mut self) {
        self.abort_all();
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_NOTIFICATION_DURATION)
    }

    pub fn with_default_duration(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(BusInner {
                messages: Observable::new(Vec::new()),
                timers: Mutex::new(HashMap::new()),
                default_duration,
            }),
        }
    }

    /// Append a message and schedule its removal.
    ///
    /// `duration` defaults to [`DEFAULT_NOTIFICATION_DURATION`]; a zero
    /// duration keeps the message until [`remove`](Self::remove) or
    /// [`clear`](Self::clear). Timers need a tokio runtime; without one the
    /// message stays up.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Option<Duration>,
    ) -> MessageId {
        let duration = duration.unwrap_or(self.inner.default_duration);
        let id = MessageId::generate();
        let message = SnackbarMessage {
            id: id.clone(),
            message: message.into(),
            kind,
            duration_ms: (!duration.is_zero()).then(|| duration.as_millis() as u64),
        };
        tracing::debug!(message_id = %id, kind = ?kind, "notification shown");
        self.inner.messages.modify(|messages| messages.push(message));

        if !duration.is_zero() {
            self.schedule_removal(id.clone(), duration);
        }
        id
    }

    fn schedule_removal(&self, id: MessageId, duration: Duration) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!(message_id = %id, "no async runtime; notification stays until dismissed");
                return;
            }
        };

        // Held across spawn so the timer cannot fire before it is registered.
        let mut timers = self
            .inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let weak: Weak<BusInner> = Arc::downgrade(&self.inner);
        let timer_id = id.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = weak.upgrade() {
                inner.take_timer(&timer_id);
                inner.remove_message(&timer_id);
            }
        });
        timers.insert(id, handle);
    }

    pub fn success(&self, message: impl Into<String>) -> MessageId {
        self.show(message, NotificationKind::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> MessageId {
        self.show(message, NotificationKind::Error, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> MessageId {
        self.show(message, NotificationKind::Warning, None)
    }

    pub fn info(&self, message: impl Into<String>) -> MessageId {
        self.show(message, NotificationKind::Info, None)
    }

    /// The `*_for` variants show a message for `duration` instead of the
    /// bus default.
    pub fn success_for(&self, message: impl Into<String>, duration: Duration) -> MessageId {
        self.show(message, NotificationKind::Success, Some(duration))
    }

    pub fn error_for(&self, message: impl Into<String>, duration: Duration) -> MessageId {
        self.show(message, NotificationKind::Error, Some(duration))
    }

    pub fn warning_for(&self, message: impl Into<String>, duration: Duration) -> MessageId {
        self.show(message, NotificationKind::Warning, Some(duration))
    }

    pub fn info_for(&self, message: impl Into<String>, duration: Duration) -> MessageId {
        self.show(message, NotificationKind::Info, Some(duration))
    }

    /// Dismiss a message. Unknown ids are ignored.
    pub fn remove(&self, id: &MessageId) {
        if let Some(handle) = self.inner.take_timer(id) {
            handle.abort();
        }
        self.inner.remove_message(id);
    }

    /// Dismiss everything and cancel all pending timers.
    pub fn clear(&self) {
        self.inner.abort_all();
        self.inner.messages.set(Vec::new());
    }

    /// Cancel pending timers, leaving current messages in place.
    pub fn cancel_timers(&self) {
        self.inner.abort_all();
    }

    pub fn messages(&self) -> Vec<SnackbarMessage> {
        self.inner.messages.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn subscribe(&self) -> Subscription<Vec<SnackbarMessage>> {
        self.inner.messages.subscribe()
    }
}
