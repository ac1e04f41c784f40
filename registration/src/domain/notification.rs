//! User-facing notifications requested by the form.

use std::time::Duration;

/// Message shown after a successful submission.
pub const SUCCESS_MESSAGE: &str = "Formulaire soumis avec succès !";
/// How long a notification stays visible unless dismissed.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

/// Transient message handed to a [`Notifier`](super::ports::Notifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text to display.
    pub message: String,
    /// Auto-dismiss delay.
    pub duration: Duration,
    /// Whether clicking the notification dismisses it early.
    pub dismiss_on_click: bool,
}

impl Notification {
    /// Success notification with the given auto-dismiss delay.
    #[must_use]
    pub fn success(duration: Duration) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_owned(),
            duration,
            dismiss_on_click: true,
        }
    }
}
