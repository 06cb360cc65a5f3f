//! Transient messages for the user.

use std::fmt;

use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A toast-style message queued by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    level: NotificationLevel,
    message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// A successful first analysis of `word`.
    pub(super) fn analyzed(word: &str) -> Self {
        Self::new(NotificationLevel::Success, format!("Deconstructed “{word}”"))
    }

    pub(super) fn regenerated() -> Self {
        Self::new(NotificationLevel::Success, "Generated a new analysis!")
    }

    pub(super) fn degraded(regenerating: bool) -> Self {
        let message = if regenerating {
            "Still having issues, but here's a new attempt!"
        } else {
            "The AI had some issues, but here's what it came up with anyway."
        };
        Self::new(NotificationLevel::Info, message)
    }

    pub(super) fn failed() -> Self {
        Self::new(
            NotificationLevel::Warning,
            "The AI doesn't like that one! Try a different word.",
        )
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
