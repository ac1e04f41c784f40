//! Port for transient user notifications.

use crate::domain::notification::Notification;

/// Fire-and-forget sink for notifications.
///
/// Display, auto-dismiss timing and click handling belong to the adapter;
/// the domain never waits on or inspects the outcome.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Request display of `notification`.
    fn notify(&self, notification: &Notification);
}
