//! ChannelAdapter trait — the interface every notification channel
//! implements.
//!
//! Adapters never return an error and never panic: every failure is
//! caught at the adapter boundary, reported through the injected
//! [`NotifyLog`], and summarized as a [`NotificationOutcome`] for the
//! dispatcher to observe.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use punchbot_core::log::{NotifyEvent, NotifyLog};
use punchbot_core::types::NotificationRequest;

use crate::relay::RelayError;
use crate::transport::TransportError;

/// Why a delivery could not complete.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("{0}")]
    Other(String),
}

/// Per-channel delivery summary.
///
/// Observability only — the dispatcher collects these but never turns
/// them into a caller-visible failure.
#[derive(Debug)]
pub enum NotificationOutcome {
    /// The channel accepted at least the text message.
    Sent,
    /// The channel is not configured; nothing was attempted.
    Skipped(&'static str),
    /// The channel received nothing.
    Failed(NotifyError),
}

impl NotificationOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotificationOutcome::Sent)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, NotificationOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NotificationOutcome::Failed(_))
    }
}

/// Every notification channel implements this trait.
///
/// The `Dispatcher` holds `Arc<dyn ChannelAdapter>` and fans each
/// request out to all of them concurrently.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Channel identifier used in config and log events
    /// (e.g. "discord", "line").
    fn name(&self) -> &'static str;

    /// Deliver one notification, best-effort.
    ///
    /// Implementations catch everything internally; the outcome is a
    /// report, not control flow.
    async fn notify(&self, request: &NotificationRequest) -> NotificationOutcome;
}

/// Resolve screenshot bytes with the shared priority order: the
/// in-memory buffer wins, the file path is the fallback and is only
/// touched when no buffer exists. A read failure logs a warning and
/// yields `None` so the caller degrades to a text-only send.
pub(crate) async fn resolve_screenshot_bytes(
    channel: &str,
    request: &NotificationRequest,
    log: &Arc<dyn NotifyLog>,
) -> Option<Vec<u8>> {
    if let Some(ref bytes) = request.screenshot_bytes {
        return Some(bytes.clone());
    }
    if let Some(ref path) = request.screenshot_path {
        match tokio::fs::read(path).await {
            Ok(bytes) => return Some(bytes),
            Err(e) => {
                log.event(
                    channel,
                    NotifyEvent::Warning,
                    &format!("screenshot read failed ({e}); sending text only"),
                );
            }
        }
    }
    None
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
