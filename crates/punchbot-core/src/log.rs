//! Notification event log — an injected capability, not a global.
//!
//! Adapters report every delivery attempt through this trait as
//! `(channel, event, detail)` tuples. The default implementation forwards
//! to `tracing`; tests substitute a recording sink to assert on the
//! emitted events.

use std::fmt;

/// Lifecycle events emitted while delivering one notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyEvent {
    /// A delivery attempt started.
    Start,
    /// The channel accepted the notification.
    Sent,
    /// The channel is not configured; nothing was attempted.
    Skipped,
    /// A recoverable problem; delivery continued in degraded form.
    Warning,
    /// The channel did not receive the notification.
    Failed,
    /// The notification was redirected to a substitute channel.
    Fallback,
}

impl NotifyEvent {
    /// Stable lowercase tag, used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyEvent::Start => "start",
            NotifyEvent::Sent => "sent",
            NotifyEvent::Skipped => "skipped",
            NotifyEvent::Warning => "warning",
            NotifyEvent::Failed => "failed",
            NotifyEvent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for NotifyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for notification lifecycle events.
///
/// Passed by construction to adapters and the dispatcher.
pub trait NotifyLog: Send + Sync {
    fn event(&self, channel: &str, event: NotifyEvent, detail: &str);
}

/// Default sink — forwards to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl NotifyLog for TracingLog {
    fn event(&self, channel: &str, event: NotifyEvent, detail: &str) {
        match event {
            NotifyEvent::Start | NotifyEvent::Sent | NotifyEvent::Fallback => {
                tracing::info!(channel = %channel, event = %event, "{detail}");
            }
            NotifyEvent::Skipped | NotifyEvent::Warning | NotifyEvent::Failed => {
                tracing::warn!(channel = %channel, event = %event, "{detail}");
            }
        }
    }
}
