use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use electro_core::model::{Notification, NotificationKind, default_notification_duration};

use crate::Clock;

/// Holds the single toast currently on screen.
///
/// Showing a new toast replaces the previous one, matching the page which
/// removes every `.custom-notification` before appending.
pub struct NotificationCenter {
    clock: Clock,
    active: Mutex<Option<Notification>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            active: Mutex::new(None),
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        self.show_for(message, kind, default_notification_duration())
    }

    pub fn show_for(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> Notification {
        let toast = Notification::new(message, kind, self.clock.now(), duration);
        tracing::debug!(kind = kind.as_str(), message = toast.message(), "notification shown");
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active = Some(toast.clone());
        toast
    }

    /// Close button: removes the toast regardless of its deadline.
    pub fn dismiss(&self) -> Option<Notification> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.current_at(self.clock.now())
    }

    /// The visible toast at `now`, ignoring one whose deadline has passed.
    #[must_use]
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|toast| !toast.is_expired(now))
            .cloned()
    }

    /// Drop the toast if it has expired at `now`, returning it.
    pub fn prune_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            return active.take();
        }
        None
    }
}
