//! Punchbot Notify — best-effort notification delivery channels.
//!
//! This crate provides:
//! - **transport**: one-shot HTTP execution (JSON and multipart)
//! - **relay**: screenshot hosting on a webhook channel, returning a CDN
//!   URL for channels that only accept image URLs
//! - **discord**: webhook-attachment channel adapter
//! - **line**: push-API channel adapter with quota fallback
//! - **dispatcher**: concurrent fan-out with per-adapter isolation
//!
//! Governing rule: notification delivery must never fail the caller.
//! Every failure is caught at the adapter boundary, reported through the
//! injected [`punchbot_core::NotifyLog`], and summarized as a
//! [`NotificationOutcome`] — nothing propagates to the test run.

pub mod base;
pub mod discord;
pub mod dispatcher;
pub mod line;
pub mod relay;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use base::{ChannelAdapter, NotificationOutcome, NotifyError};
pub use dispatcher::{ChannelOutcome, Dispatcher};
pub use relay::{ImageRelay, RelayError, UploadResult};
pub use transport::{Transport, TransportError};
