//! Notifier adapters.

use std::io::Write;
use std::sync::Mutex;

use tracing::{info, warn};

use crate::domain::Notification;
use crate::domain::ports::Notifier;

/// Emits notifications as structured `info` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            message = %notification.message,
            duration = ?notification.duration,
            dismiss_on_click = notification.dismiss_on_click,
            "notification"
        );
    }
}

/// Writes notifications to a terminal-like writer.
///
/// Terminals cannot retract a line, so the auto-dismiss delay is printed
/// alongside the message instead.
#[derive(Debug)]
pub struct TerminalNotifier<W> {
    writer: Mutex<W>,
}

impl<W> TerminalNotifier<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    ///
    /// # Panics
    /// Panics if a previous write panicked while holding the writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(_) => panic!("terminal notifier writer poisoned"),
        }
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: &Notification) {
        let Ok(mut writer) = self.writer.lock() else {
            warn!("terminal notifier writer poisoned; notification dropped");
            return;
        };
        let result = writeln!(
            writer,
            "✔ {} ({} ms)",
            notification.message,
            notification.duration.as_millis()
        )
        .and_then(|()| writer.flush());
        if let Err(error) = result {
            warn!(%error, "failed to write notification");
        }
    }
}
