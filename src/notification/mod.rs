//! User-facing notifications.
//!
//! Hooks report the outcome of user actions ("Welcome back!", "Unable to
//! connect...") through a [`Notifier`]. Notifying is fire-and-forget: it is a
//! synchronous call that must not block, and the hooks never wait on it.

mod renderer;

pub use renderer::NotificationRenderer;

use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::AppError;

/// How long a regular notification stays visible.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(4);

/// How long an error notification stays visible.
pub const ERROR_DURATION: Duration = Duration::from_secs(5);

/// Visual severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A message to surface to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Headline.
    pub message: String,
    /// Optional secondary line.
    pub description: Option<String>,
    /// How long the notification should stay visible.
    pub duration: Duration,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            description: None,
            duration,
        }
    }

    /// Creates a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message, DEFAULT_DURATION)
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message, ERROR_DURATION)
    }

    /// Creates an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message, DEFAULT_DURATION)
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message, DEFAULT_DURATION)
    }

    /// Creates an error notification describing `error`.
    ///
    /// The headline is the kind's user-facing message; the error's details,
    /// when present, become the description.
    pub fn from_error(error: &AppError) -> Self {
        let notification = Self::error(error.user_message());
        match error.details() {
            Some(details) => notification.with_description(details.to_string()),
            None => notification,
        }
    }

    /// Sets the secondary line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if this notification reports a failure.
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.message, description),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    /// Deliver `notification`. Must return promptly.
    fn notify(&self, notification: Notification);

    /// Shorthand for a success notification.
    fn success(&self, message: &str, description: Option<&str>) {
        let mut notification = Notification::success(message);
        notification.description = description.map(str::to_string);
        self.notify(notification);
    }

    /// Shorthand for an info notification.
    fn info(&self, message: &str, description: Option<&str>) {
        let mut notification = Notification::info(message);
        notification.description = description.map(str::to_string);
        self.notify(notification);
    }

    /// Shorthand for reporting a normalized error.
    fn show_error(&self, error: &AppError) {
        self.notify(Notification::from_error(error));
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or("");
        match notification.kind {
            NotificationKind::Error => {
                tracing::error!(title = %notification.message, description, "notification")
            }
            NotificationKind::Warning => {
                tracing::warn!(title = %notification.message, description, "notification")
            }
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(kind = %notification.kind, title = %notification.message, description, "notification")
            }
        }
    }
}

/// Forwards notifications to an unbounded channel, for a UI task to drain.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}
