//! Transient user notifications backed by a `tokio::sync::broadcast`
//! channel.
//!
//! Screens publish a [`Notification`] after an action settles; whatever
//! renders toasts subscribes and shows them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// How long a success toast stays up.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(2);

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// `None` means the notification stays until dismissed.
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".into(),
            text: text.into(),
            created_at: Utc::now(),
            auto_dismiss: Some(SUCCESS_DISMISS_AFTER),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".into(),
            text: text.into(),
            created_at: Utc::now(),
            auto_dismiss: None,
        }
    }

    /// Whether an auto-dismissing notification has run its course at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.auto_dismiss {
            Some(after) => chrono::Duration::from_std(after)
                .map(|after| now >= self.created_at + after)
                .unwrap_or(false),
            None => false,
        }
    }
}

/// Fan-out bus for [`Notification`]s. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to every current subscriber. Dropped silently when nobody
    /// is listening.
    pub fn publish(&self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            text = %notification.text,
            "Publishing notification",
        );
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}
